//! Tests for read identifier generation

use chrono::{TimeZone, Utc};
use std::collections::BTreeSet;
use tempfile::TempDir;

use crate::app::services::persistence::{
    SourceRead, create_new_file, format_read_id, generate_read_id,
};

#[test]
fn test_read_id_prefers_device() {
    let parsed_at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 7).unwrap();
    let source = SourceRead::new("DXS*CN1")
        .with_device("Lobby Machine/2")
        .with_path("/tmp/audit.dex");

    assert_eq!(
        format_read_id(&source, parsed_at, "0a1b2c"),
        "Lobby_Machine_2-20240305T143007000Z-0a1b2c"
    );
}

#[test]
fn test_read_id_falls_back_to_file_stem_then_default() {
    let parsed_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let from_path = SourceRead::new("").with_path("/data/route-12.dex");
    assert_eq!(
        format_read_id(&from_path, parsed_at, "ff"),
        "route-12-20240101T000000000Z-ff"
    );

    let blank_device = SourceRead::new("").with_device("  ");
    assert_eq!(
        format_read_id(&blank_device, parsed_at, "ff"),
        "read-20240101T000000000Z-ff"
    );
}

#[test]
fn test_same_device_and_instant_gets_distinct_ids() {
    let parsed_at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 7).unwrap();
    let source = SourceRead::new("DXS*CN1").with_device("machine-7");

    let ids: BTreeSet<String> = (0..50)
        .map(|_| generate_read_id(&source, parsed_at))
        .collect();

    assert_eq!(ids.len(), 50);
    for id in &ids {
        assert!(id.starts_with("machine-7-20240305T143007000Z-"));
        assert_eq!(id.len(), "machine-7-20240305T143007000Z-".len() + 12);
    }
}

#[test]
fn test_create_new_file_refuses_existing_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("stored.json");
    std::fs::write(&path, "first").unwrap();

    let error = create_new_file(&path).unwrap_err();
    assert!(error.to_string().contains("Refusing to overwrite"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");

    let fresh = temp_dir.path().join("fresh.json");
    assert!(create_new_file(&fresh).is_ok());
    assert!(fresh.exists());
}
