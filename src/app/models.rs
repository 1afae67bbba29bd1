//! Data models for DEX audit processing
//!
//! This module contains the core data structures produced by the parsing
//! pipeline: record types, typed segment payloads, consolidated selections,
//! grid positions and the top-level read result.

pub mod issues;

pub use issues::{IssueKind, ParseIssue};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

// =============================================================================
// Record Types and Dialects
// =============================================================================

/// Closed set of record kinds a DEX line can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordType {
    /// DXS - start of a DEX transmission
    StreamStart,
    /// DXE - end of a DEX transmission
    StreamEnd,
    /// ST - transaction set header
    TransactionHeader,
    /// SE - transaction set trailer
    TransactionTrailer,
    /// G85 - transaction set checksum
    Checksum,
    /// ID1..ID5 - machine identification
    Identification(u8),
    /// CB1 - control board identification
    ControlBoard,
    /// VA1..VA3 - paid, test and free vend totals
    VendTotals(u8),
    /// CA2..CA3 - coin mechanism sales and cash-in totals
    CashActivity(u8),
    /// DA2 - cashless device sales totals
    CashlessActivity,
    /// PA1..PA8 - per-selection product activity
    ProductActivity(u8),
    /// Any tag not present in the classification table
    Unknown,
}

impl RecordType {
    /// Whether this record describes a single selection
    pub fn is_product_activity(&self) -> bool {
        matches!(self, RecordType::ProductActivity(_))
    }

    /// Canonical DEX tag for the record type
    pub fn tag(&self) -> String {
        match self {
            RecordType::StreamStart => "DXS".to_string(),
            RecordType::StreamEnd => "DXE".to_string(),
            RecordType::TransactionHeader => "ST".to_string(),
            RecordType::TransactionTrailer => "SE".to_string(),
            RecordType::Checksum => "G85".to_string(),
            RecordType::Identification(n) => format!("ID{}", n),
            RecordType::ControlBoard => "CB1".to_string(),
            RecordType::VendTotals(n) => format!("VA{}", n),
            RecordType::CashActivity(n) => format!("CA{}", n),
            RecordType::CashlessActivity => "DA2".to_string(),
            RecordType::ProductActivity(n) => format!("PA{}", n),
            RecordType::Unknown => "unknown".to_string(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

/// Manufacturer dialect governing field order, money units and selection layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Most common EVA-DTS field ordering, used when no manufacturer is recognized
    Generic,
    /// Crane and National Vendors controllers
    Crane,
    /// Automatic Products controllers (money reported in whole currency units)
    AutomaticProducts,
    /// Dixie-Narco controllers
    DixieNarco,
}

impl Dialect {
    /// All dialects, in declaration order
    pub const ALL: [Dialect; 4] = [
        Dialect::Generic,
        Dialect::Crane,
        Dialect::AutomaticProducts,
        Dialect::DixieNarco,
    ];

    /// Stable lowercase name used in configuration and reports
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Crane => "crane",
            Dialect::AutomaticProducts => "automatic_products",
            Dialect::DixieNarco => "dixie_narco",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Dialect::ALL
            .iter()
            .copied()
            .find(|dialect| dialect.name() == normalized)
            .ok_or_else(|| {
                Error::configuration(format!(
                    "Unknown dialect '{}'. Available dialects: {}",
                    s,
                    Dialect::ALL
                        .iter()
                        .map(|d| d.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

// =============================================================================
// Typed Segment Payloads
// =============================================================================

/// DXS payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamHeader {
    pub communication_id: Option<String>,
    pub functional_id: Option<String>,
    pub version: Option<String>,
    pub transmission_number: Option<i64>,
}

/// DXE payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamTrailer {
    pub transmission_number: Option<i64>,
    pub set_count: Option<i64>,
}

/// ST payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    pub set_id: Option<String>,
    pub control_number: Option<String>,
}

/// SE payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTrailer {
    /// Declared number of segments from ST through SE inclusive
    pub segment_count: Option<i64>,
    pub control_number: Option<String>,
}

/// G85 payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
    pub value: Option<String>,
}

/// ID1..ID5 payload; each subtype fills only the fields it defines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    pub serial_number: Option<String>,
    pub model_number: Option<String>,
    pub build_standard: Option<String>,
    pub location: Option<String>,
    pub asset_number: Option<String>,
    pub decimal_places: Option<i64>,
    pub currency_code: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// CB1 payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlBoard {
    pub serial_number: Option<String>,
    pub model_number: Option<String>,
    pub software_version: Option<String>,
}

/// VA1..VA3 payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendTotals {
    pub value_cents: Option<i64>,
    pub count: Option<i64>,
}

/// CA2..CA3 payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashActivity {
    pub sales_cents: Option<i64>,
    pub sales_count: Option<i64>,
    pub cash_in_cents: Option<i64>,
    pub to_cash_box_cents: Option<i64>,
    pub to_tubes_cents: Option<i64>,
    pub bills_in_cents: Option<i64>,
}

/// DA2 payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashlessActivity {
    pub sales_cents: Option<i64>,
    pub sales_count: Option<i64>,
}

/// PA1..PA8 payload for one selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductActivity {
    /// Selection code as printed by the machine (e.g. "A1", "12")
    pub selection_code: String,
    pub price_cents: Option<i64>,
    pub capacity: Option<i64>,
    pub product_id: Option<String>,
    pub units_sold: Option<i64>,
    pub revenue_cents: Option<i64>,
    pub test_vends: Option<i64>,
    pub free_vends: Option<i64>,
    pub cash_sales_count: Option<i64>,
    pub cash_sales_cents: Option<i64>,
    pub cashless_sales_count: Option<i64>,
    pub cashless_sales_cents: Option<i64>,
    pub discount_count: Option<i64>,
    pub discount_cents: Option<i64>,
    /// Raw "date time" of the last sold-out event (PA5)
    pub sold_out_at: Option<String>,
    /// Payment device code (PA7)
    pub payment_device: Option<String>,
    /// Price list number (PA6, PA7)
    pub price_list: Option<i64>,
    /// Price on that price list or payment device (PA6, PA7); not consolidated
    pub price_list_price_cents: Option<i64>,
}

/// Typed payload of a successfully mapped record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordPayload {
    StreamHeader(StreamHeader),
    StreamTrailer(StreamTrailer),
    TransactionHeader(TransactionHeader),
    TransactionTrailer(TransactionTrailer),
    Checksum(Checksum),
    Identification(Identification),
    ControlBoard(ControlBoard),
    VendTotals(VendTotals),
    CashActivity(CashActivity),
    CashlessActivity(CashlessActivity),
    ProductActivity(ProductActivity),
}

/// One input line after classification and field mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub record_type: RecordType,
    /// 1-based line number in the source text
    pub line_number: usize,
    /// Tag exactly as it appeared in the file
    pub tag: String,
    /// Typed fields; `None` for unknown records and mapping failures
    pub payload: Option<RecordPayload>,
    /// Mapping error message, if mapping failed
    pub error: Option<String>,
}

impl ParsedRecord {
    /// Product-activity payload, if this record carries one
    pub fn product_activity(&self) -> Option<&ProductActivity> {
        match &self.payload {
            Some(RecordPayload::ProductActivity(activity)) => Some(activity),
            _ => None,
        }
    }

    /// Whether mapping this record failed
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

// =============================================================================
// Consolidation and Grid Structures
// =============================================================================

/// Inferred physical placement of a selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: String,
    pub column: String,
}

impl GridPosition {
    pub fn new(row: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            row: row.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} / column {}", self.row, self.column)
    }
}

/// Selection-code numbering conventions known to the grid analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridConvention {
    /// "A1", "B12": row letter followed by column number
    AlphaRowNumericColumn,
    /// "1A", "12C": row number followed by column letter
    NumericRowAlphaColumn,
    /// "11", "35": tens digit is the row, units digit the column
    NumericRowTimesTen,
    /// "101", "1203": hundreds are the row, remainder the column
    NumericRowTimesHundred,
    /// "1".."40" or "S01".."S40": flat index folded by a known column count
    FlatSequential,
    /// No convention placed every selection without collision
    NoPattern,
}

impl GridConvention {
    /// Human-readable description used in reports
    pub fn description(&self) -> &'static str {
        match self {
            GridConvention::AlphaRowNumericColumn => "letter row, numeric column",
            GridConvention::NumericRowAlphaColumn => "numeric row, letter column",
            GridConvention::NumericRowTimesTen => "row x 10 + column",
            GridConvention::NumericRowTimesHundred => "row x 100 + column",
            GridConvention::FlatSequential => "flat sequential index",
            GridConvention::NoPattern => "no discernible pattern",
        }
    }
}

/// One physical selection with all of its product-activity records merged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedSelection {
    pub selection_code: String,
    pub price_cents: Option<i64>,
    pub capacity: Option<i64>,
    pub product_id: Option<String>,
    pub units_sold: Option<i64>,
    pub revenue_cents: Option<i64>,
    pub test_vends: Option<i64>,
    pub free_vends: Option<i64>,
    pub cash_sales_count: Option<i64>,
    pub cash_sales_cents: Option<i64>,
    pub cashless_sales_count: Option<i64>,
    pub cashless_sales_cents: Option<i64>,
    pub discount_count: Option<i64>,
    pub discount_cents: Option<i64>,
    pub sold_out_at: Option<String>,
    /// Source lines that contributed, ascending
    pub line_numbers: Vec<usize>,
    /// PA subtypes that contributed, ascending and distinct
    pub subtypes: Vec<u8>,
    pub grid_position: Option<GridPosition>,
}

/// Grid inference outcome attached to a read result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSummary {
    pub convention: GridConvention,
    pub rows: usize,
    pub columns: usize,
}

impl Default for GridSummary {
    fn default() -> Self {
        Self {
            convention: GridConvention::NoPattern,
            rows: 0,
            columns: 0,
        }
    }
}

// =============================================================================
// Read Result
// =============================================================================

/// Complete outcome of parsing one DEX file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexReadResult {
    pub dialect: Dialect,
    /// Manufacturer code that selected the dialect, if one was recognized
    pub manufacturer_code: Option<String>,
    pub records: Vec<ParsedRecord>,
    pub selections: Vec<ConsolidatedSelection>,
    pub grid: GridSummary,
    /// False only when the input could not be tokenized into any record
    pub success: bool,
    pub issues: Vec<ParseIssue>,
}

impl DexReadResult {
    /// Result for input that produced no records at all
    pub fn failed(issues: Vec<ParseIssue>) -> Self {
        Self {
            dialect: Dialect::Generic,
            manufacturer_code: None,
            records: Vec::new(),
            selections: Vec::new(),
            grid: GridSummary::default(),
            success: false,
            issues,
        }
    }

    /// Look up a consolidated selection by code
    pub fn selection(&self, code: &str) -> Option<&ConsolidatedSelection> {
        self.selections.iter().find(|s| s.selection_code == code)
    }

    /// Issues of one kind, in report order
    pub fn issues_of(&self, kind: IssueKind) -> Vec<&ParseIssue> {
        self.issues.iter().filter(|issue| issue.kind == kind).collect()
    }

    /// Records of one type, in file order
    pub fn records_of(&self, record_type: RecordType) -> Vec<&ParsedRecord> {
        self.records
            .iter()
            .filter(|record| record.record_type == record_type)
            .collect()
    }
}
