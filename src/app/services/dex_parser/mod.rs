//! DEX parser for vending-machine audit files
//!
//! This module turns the raw text of a DEX export into typed records, one
//! consolidated entry per selection and an inferred grid layout. Problems are
//! reported as issues on the result instead of aborting the read.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`tokenizer`] - Line splitting and element tokenization
//! - [`classifier`] - Segment tag to record type lookup
//! - [`dialect`] - Manufacturer dialect resolution from identification records
//! - [`field_layouts`] - Per-dialect element positions for every record type
//! - [`field_parsers`] - Count, money and text element conversion
//! - [`record_mapper`] - Typed payload construction with selection context
//! - [`envelope`] - DXS/ST/SE/DXE integrity checks
//! - [`parser`] - Pipeline orchestration and file handling
//! - [`stats`] - Parsing statistics
//!
//! ## Usage
//!
//! ```rust
//! use dex_reader::{DexParser, ParseOptions};
//!
//! let parser = DexParser::new(ParseOptions::default().with_column_hint(8));
//! let result = parser.parse_str("DXS*CN12345*VA*V1/1*1\nPA1*A1*150\nPA2*A1*150*3*450\nDXE*1*0");
//!
//! assert!(result.success);
//! println!("Parsed {} selections", result.selections.len());
//! ```

pub mod classifier;
pub mod dialect;
pub mod envelope;
pub mod field_layouts;
pub mod field_parsers;
pub mod parser;
pub mod record_mapper;
pub mod stats;
pub mod tokenizer;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use classifier::ClassifiedLine;
pub use dialect::{DialectResolution, DialectResolver};
pub use field_parsers::MoneyUnit;
pub use parser::{DexParser, ParseOptions, read_source};
pub use stats::ParseStats;
pub use tokenizer::TokenizedLine;
