//! Product-activity consolidation
//!
//! DEX files describe one physical selection across several PA subtypes (price
//! and capacity in PA1, sales in PA2, tests in PA3 and so on). This module
//! folds them into a single [`ConsolidatedSelection`] per selection code.
//!
//! - [`merge_rules`] - Per-field merge rule table
//! - [`consolidator`] - Grouping, merging and warning generation
//!
//! [`ConsolidatedSelection`]: crate::app::models::ConsolidatedSelection

pub mod consolidator;
pub mod merge_rules;

#[cfg(test)]
pub mod tests;

pub use consolidator::{
    ActivityEntry, ConsolidationOutcome, consolidate, consolidate_records, single_source_warning,
};
pub use merge_rules::{MergeRule, MergeValue, ProductField};
