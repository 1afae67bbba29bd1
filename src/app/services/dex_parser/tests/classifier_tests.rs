//! Tests for record classification

use super::*;
use crate::app::models::RecordType;
use crate::app::services::dex_parser::classifier::lookup_tag;

#[test]
fn test_lookup_known_tags() {
    assert_eq!(lookup_tag("DXS"), Some(RecordType::StreamStart));
    assert_eq!(lookup_tag("g85"), Some(RecordType::Checksum));
    assert_eq!(lookup_tag("PA7"), Some(RecordType::ProductActivity(7)));
    assert_eq!(lookup_tag("DA2"), Some(RecordType::CashlessActivity));
    assert_eq!(lookup_tag("EA1"), None);
}

#[test]
fn test_classify_every_line_once() {
    let lines = classify_text(&create_crane_dex());

    assert_eq!(lines.len(), 12);
    assert_eq!(lines[0].record_type, RecordType::StreamStart);
    assert_eq!(lines[2].record_type, RecordType::Identification(1));
    assert_eq!(lines[7].record_type, RecordType::ProductActivity(7));
    assert_eq!(lines[11].record_type, RecordType::StreamEnd);
}

#[test]
fn test_classify_split_subtype() {
    let lines = classify_text("PA*1*A1*150\nVA*1*4500*30");

    assert_eq!(lines[0].record_type, RecordType::ProductActivity(1));
    assert!(lines[0].split_subtype);
    assert_eq!(lines[0].field(1), Some("A1"));
    assert_eq!(lines[0].field(2), Some("150"));

    assert_eq!(lines[1].record_type, RecordType::VendTotals(1));
    assert_eq!(lines[1].field(1), Some("4500"));
}

#[test]
fn test_classify_unknown_tags() {
    let lines = classify_text("EA1*EGS*20240101\nPA*X*A1\nPA*9*A1");

    assert!(lines.iter().all(|l| l.record_type == RecordType::Unknown));
    // Unknown lines keep their elements untouched
    assert_eq!(lines[1].field(1), Some("X"));
    assert!(!lines[2].split_subtype);
}
