//! Tests for parsing statistics functionality

use super::*;
use crate::app::models::IssueKind;
use crate::app::services::dex_parser::{DexParser, ParseStats};

#[test]
fn test_parse_stats_calculation() {
    let stats = ParseStats {
        total_records: 100,
        records_mapped: 95,
        records_failed: 5,
        unknown_records: 0,
        selections: 20,
        issues: 5,
        errors: 5,
    };

    assert_eq!(stats.success_rate(), 95.0);
    assert!(stats.is_successful());

    let poor_stats = ParseStats {
        total_records: 110,
        records_mapped: 80,
        records_failed: 20,
        unknown_records: 10,
        ..ParseStats::default()
    };

    assert_eq!(poor_stats.success_rate(), 80.0);
    assert!(!poor_stats.is_successful());
}

#[test]
fn test_parse_stats_empty() {
    let empty_stats = ParseStats::new();

    assert_eq!(empty_stats.total_records, 0);
    assert_eq!(empty_stats.success_rate(), 0.0);
    assert!(!empty_stats.is_successful());
}

#[test]
fn test_stats_from_result() {
    let text = format!("{}\nEA1*EGS\nPA9X*1", create_crane_dex());
    let result = DexParser::default().parse_str(&text);
    let stats = result.stats();

    assert_eq!(stats.total_records, 14);
    assert_eq!(stats.unknown_records, 2);
    assert_eq!(stats.records_mapped, 12);
    assert_eq!(stats.records_failed, 0);
    assert_eq!(stats.selections, 2);
    assert_eq!(stats.success_rate(), 100.0);
    assert_eq!(result.issue_count(IssueKind::UnknownRecord), 2);
}
