//! Grid pattern inference
//!
//! Recovers the physical row/column layout of a machine from its selection
//! codes. The encoding is manufacturer-specific and never declared in the file,
//! so a fixed list of conventions is tried in priority order.
//!
//! - [`conventions`] - Convention table and per-convention placement
//! - [`analyzer`] - Priority search, warnings and label ordering

pub mod analyzer;
pub mod conventions;

#[cfg(test)]
pub mod tests;

pub use analyzer::{GridAnalysis, GridAnalyzer, sort_labels};
pub use conventions::{CONVENTION_PRIORITY, ConventionAttempt};
