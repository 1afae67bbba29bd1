//! Grouping and merging of product-activity records by selection
//!
//! Records are processed in ascending line order regardless of the order they
//! are handed in, so the result depends only on the file.

use std::collections::HashMap;
use tracing::{debug, info};

use super::merge_rules::{MergeRule, ProductField, merge};
use crate::app::models::{
    ConsolidatedSelection, IssueKind, ParseIssue, ParsedRecord, ProductActivity, RecordType,
};

/// One product-activity payload with its origin
#[derive(Debug, Clone, Copy)]
pub struct ActivityEntry<'a> {
    pub line_number: usize,
    pub subtype: u8,
    pub activity: &'a ProductActivity,
}

/// Consolidated selections and the warnings raised while merging
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsolidationOutcome {
    /// One entry per selection code, ordered by first contributing line
    pub selections: Vec<ConsolidatedSelection>,
    pub warnings: Vec<ParseIssue>,
}

/// Collect product-activity entries from mapped records and consolidate them
pub fn consolidate_records(records: &[ParsedRecord]) -> ConsolidationOutcome {
    let entries = records
        .iter()
        .filter_map(|record| match (record.record_type, record.product_activity()) {
            (RecordType::ProductActivity(subtype), Some(activity)) => Some(ActivityEntry {
                line_number: record.line_number,
                subtype,
                activity,
            }),
            _ => None,
        })
        .collect();

    consolidate(entries)
}

/// Merge entries into one [`ConsolidatedSelection`] per selection code
pub fn consolidate(mut entries: Vec<ActivityEntry<'_>>) -> ConsolidationOutcome {
    entries.sort_by_key(|entry| entry.line_number);

    let mut outcome = ConsolidationOutcome::default();
    let mut index_by_code: HashMap<String, usize> = HashMap::new();

    for entry in &entries {
        let code = &entry.activity.selection_code;
        let index = *index_by_code.entry(code.clone()).or_insert_with(|| {
            outcome.selections.push(ConsolidatedSelection {
                selection_code: code.clone(),
                ..Default::default()
            });
            outcome.selections.len() - 1
        });

        let selection = &mut outcome.selections[index];
        merge_entry(selection, entry, &mut outcome.warnings);
    }

    let single_source: Vec<ParseIssue> = outcome
        .selections
        .iter()
        .filter_map(single_source_warning)
        .collect();
    outcome.warnings.extend(single_source);

    debug!(
        "Consolidated {} product records into {} selections",
        entries.len(),
        outcome.selections.len()
    );
    if !outcome.warnings.is_empty() {
        info!(
            "Consolidation produced {} warnings",
            outcome.warnings.len()
        );
    }

    outcome
}

/// Warning for a selection that only one PA subtype describes
///
/// The issue points at the first contributing line when there is one.
pub fn single_source_warning(selection: &ConsolidatedSelection) -> Option<ParseIssue> {
    let [only] = selection.subtypes.as_slice() else {
        return None;
    };

    let issue = ParseIssue::new(
        IssueKind::ConsolidationWarning,
        format!(
            "selection '{}' is reported only by PA{}",
            selection.selection_code, only
        ),
    );

    Some(match selection.line_numbers.first() {
        Some(line) => issue.at_line(*line),
        None => issue,
    })
}

fn merge_entry(
    selection: &mut ConsolidatedSelection,
    entry: &ActivityEntry<'_>,
    warnings: &mut Vec<ParseIssue>,
) {
    for field in ProductField::ALL {
        let rule = field.merge_rule();
        let current = field.current(selection);
        let incoming = field.read(entry.activity);

        if rule == MergeRule::Last {
            if let (Some(previous), Some(next)) = (&current, &incoming) {
                if previous != next {
                    warnings.push(
                        ParseIssue::new(
                            IssueKind::ConsolidationWarning,
                            format!(
                                "selection '{}': {} changed from {} to {}",
                                selection.selection_code, field, previous, next
                            ),
                        )
                        .at_line(entry.line_number),
                    );
                }
            }
        }

        field.write(selection, merge(rule, current, incoming));
    }

    selection.line_numbers.push(entry.line_number);
    if let Err(position) = selection.subtypes.binary_search(&entry.subtype) {
        selection.subtypes.insert(position, entry.subtype);
    }
}
