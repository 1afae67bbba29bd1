//! Tests for envelope integrity checks

use crate::app::models::IssueKind;
use crate::app::services::dex_parser::DexParser;
use crate::app::services::dex_parser::envelope::check_envelope;

use super::*;

fn integrity_messages(text: &str) -> Vec<String> {
    let result = DexParser::default().parse_str(text);
    check_envelope(&result.records)
        .into_iter()
        .inspect(|issue| assert_eq!(issue.kind, IssueKind::IntegrityWarning))
        .map(|issue| issue.message)
        .collect()
}

#[test]
fn test_well_formed_files_have_no_integrity_warnings() {
    for text in [
        create_crane_dex(),
        create_generic_dex(),
        create_automatic_products_dex(),
        create_dixie_narco_dex(),
    ] {
        assert!(integrity_messages(&text).is_empty(), "{}", text);
    }
}

#[test]
fn test_missing_stream_markers() {
    let messages = integrity_messages("ST*001*0001\nPA1*A1*100\nSE*3*0001");

    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("DXS"));
    assert!(messages[1].contains("DXE"));
}

#[test]
fn test_segment_count_mismatch() {
    let messages =
        integrity_messages("DXS*CN1*VA\nST*001*0001\nPA1*A1*100\nSE*5*0001\nDXE*1*1");

    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("declares 5 segments but the set contains 3"));
}

#[test]
fn test_unbalanced_sets_and_set_count() {
    let messages = integrity_messages("DXS*CN1*VA\nSE*1*0001\nST*001*0001\nPA1*A1*100\nDXE*1*2");

    assert!(messages.iter().any(|m| m.contains("SE trailer without ST header")));
    assert!(messages.iter().any(|m| m.contains("has no SE trailer")));
    assert!(messages.iter().any(|m| m.contains("DXE declares 2 transaction sets but 0")));
}
