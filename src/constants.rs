//! Application constants for the DEX reader
//!
//! This module contains the closed lookup tables that drive classification and
//! dialect resolution, plus default values used by configuration and the CLI.
//! Extending the reader with a new record tag or manufacturer code is a table
//! edit here, not a pipeline change.

use crate::app::models::{Dialect, RecordType};

// =============================================================================
// Segment Syntax
// =============================================================================

/// Default element separator inside a DEX segment
pub const DEFAULT_FIELD_DELIMITER: char = '*';

/// Number of leading lines searched for a manufacturer code
pub const DEFAULT_IDENTIFICATION_SCAN_LIMIT: usize = 20;

// =============================================================================
// Record Classification Tables
// =============================================================================

/// Segment tag to record type mapping
pub const RECORD_TAGS: &[(&str, RecordType)] = &[
    ("DXS", RecordType::StreamStart),
    ("DXE", RecordType::StreamEnd),
    ("ST", RecordType::TransactionHeader),
    ("SE", RecordType::TransactionTrailer),
    ("G85", RecordType::Checksum),
    ("ID1", RecordType::Identification(1)),
    ("ID2", RecordType::Identification(2)),
    ("ID3", RecordType::Identification(3)),
    ("ID4", RecordType::Identification(4)),
    ("ID5", RecordType::Identification(5)),
    ("CB1", RecordType::ControlBoard),
    ("VA1", RecordType::VendTotals(1)),
    ("VA2", RecordType::VendTotals(2)),
    ("VA3", RecordType::VendTotals(3)),
    ("CA2", RecordType::CashActivity(2)),
    ("CA3", RecordType::CashActivity(3)),
    ("DA2", RecordType::CashlessActivity),
    ("PA1", RecordType::ProductActivity(1)),
    ("PA2", RecordType::ProductActivity(2)),
    ("PA3", RecordType::ProductActivity(3)),
    ("PA4", RecordType::ProductActivity(4)),
    ("PA5", RecordType::ProductActivity(5)),
    ("PA6", RecordType::ProductActivity(6)),
    ("PA7", RecordType::ProductActivity(7)),
    ("PA8", RecordType::ProductActivity(8)),
];

/// Two-character tag families that some controllers emit with the subtype as a
/// separate element (`PA*1*A1*150` instead of `PA1*A1*150`)
pub const SPLIT_TAG_FAMILIES: &[&str] = &["PA", "ID", "VA", "CA", "DA"];

// =============================================================================
// Manufacturer Dialects
// =============================================================================

/// Manufacturer code to dialect mapping, matched by longest prefix
pub const MANUFACTURER_CODES: &[(&str, Dialect)] = &[
    ("CN", Dialect::Crane),
    // National Vendors controllers share the Crane layout
    ("NAT", Dialect::Crane),
    ("AP", Dialect::AutomaticProducts),
    ("DN", Dialect::DixieNarco),
];

/// Identification records and the element position holding a manufacturer code
pub const IDENTIFICATION_SOURCES: &[(RecordType, usize)] = &[
    (RecordType::StreamStart, 1),
    (RecordType::Identification(1), 2),
    (RecordType::ControlBoard, 2),
];

// =============================================================================
// Payment Devices (PA7 element 2)
// =============================================================================

/// Device codes counted as cash sales
pub const CASH_DEVICES: &[&str] = &["CA"];

/// Device codes counted as cashless sales
pub const CASHLESS_DEVICES: &[&str] = &["DA", "DB"];

// =============================================================================
// CLI and Processing Defaults
// =============================================================================

/// Default number of files parsed concurrently (0 = number of CPUs)
pub const DEFAULT_WORKERS: usize = 0;

/// Upper bound accepted for the worker count
pub const MAX_WORKERS: usize = 64;

/// File extensions picked up when a directory is given as input
pub const DEX_FILE_EXTENSIONS: &[&str] = &["dex", "txt", "dat"];

/// Application name used for configuration directories
pub const APP_NAME: &str = "dex-reader";

/// Configuration file name inside the configuration directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the column-count hint
pub const ENV_COLUMN_HINT: &str = "DEX_READER_COLUMN_HINT";

/// Environment variable overriding the worker count
pub const ENV_WORKERS: &str = "DEX_READER_WORKERS";

/// Environment variable overriding the store directory
pub const ENV_STORE_DIR: &str = "DEX_READER_STORE_DIR";
