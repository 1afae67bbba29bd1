//! Grid inference over a machine's selection codes

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::conventions::{CONVENTION_PRIORITY, ConventionAttempt, assign};
use crate::app::models::{GridConvention, GridPosition, GridSummary, IssueKind, ParseIssue};

/// Outcome of grid inference
#[derive(Debug, Clone, PartialEq)]
pub struct GridAnalysis {
    pub convention: GridConvention,
    /// Position of every selection code; empty when no convention fits
    pub positions: BTreeMap<String, GridPosition>,
    pub warnings: Vec<ParseIssue>,
}

impl GridAnalysis {
    /// Distinct row labels in natural order
    pub fn rows(&self) -> Vec<String> {
        sort_labels(self.positions.values().map(|p| p.row.clone()))
    }

    /// Distinct column labels in natural order
    pub fn columns(&self) -> Vec<String> {
        sort_labels(self.positions.values().map(|p| p.column.clone()))
    }

    pub fn summary(&self) -> GridSummary {
        GridSummary {
            convention: self.convention,
            rows: self.rows().len(),
            columns: self.columns().len(),
        }
    }
}

/// Tries numbering conventions in priority order until one fits
#[derive(Debug, Clone)]
pub struct GridAnalyzer {
    column_hint: Option<u32>,
    priority: Vec<GridConvention>,
}

impl Default for GridAnalyzer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl GridAnalyzer {
    /// Create an analyzer; a zero column hint is treated as absent
    pub fn new(column_hint: Option<u32>) -> Self {
        Self {
            column_hint: column_hint.filter(|columns| *columns > 0),
            priority: CONVENTION_PRIORITY.to_vec(),
        }
    }

    /// Replace the convention order
    pub fn with_priority(mut self, priority: Vec<GridConvention>) -> Self {
        self.priority = priority
            .into_iter()
            .filter(|convention| *convention != GridConvention::NoPattern)
            .collect();
        self
    }

    /// Infer the grid for a set of selection codes
    pub fn analyze<'a>(&self, codes: impl IntoIterator<Item = &'a str>) -> GridAnalysis {
        let distinct: BTreeSet<&str> = codes.into_iter().collect();
        let codes: Vec<&str> = distinct.into_iter().collect();
        let mut warnings = Vec::new();

        if codes.is_empty() {
            return GridAnalysis {
                convention: GridConvention::NoPattern,
                positions: BTreeMap::new(),
                warnings,
            };
        }

        for convention in &self.priority {
            match assign(*convention, &codes, self.column_hint) {
                ConventionAttempt::Accepted(positions) => {
                    debug!(
                        "Grid convention {:?} placed {} selections",
                        convention,
                        positions.len()
                    );
                    return GridAnalysis {
                        convention: *convention,
                        positions,
                        warnings,
                    };
                }
                ConventionAttempt::Inapplicable { code } => {
                    debug!("Grid convention {:?} rejected: '{}' does not fit", convention, code);
                }
                ConventionAttempt::Collision {
                    first,
                    second,
                    position,
                } => {
                    debug!(
                        "Grid convention {:?} rejected: '{}' and '{}' both map to {}",
                        convention, first, second, position
                    );
                }
                ConventionAttempt::MissingHint => {
                    warnings.push(ParseIssue::new(
                        IssueKind::GridInferenceWarning,
                        format!(
                            "selection codes look like a {} but no column count was given",
                            convention.description()
                        ),
                    ));
                }
            }
        }

        warnings.push(ParseIssue::new(
            IssueKind::GridInferenceWarning,
            format!(
                "no numbering convention places all {} selections without collision",
                codes.len()
            ),
        ));

        GridAnalysis {
            convention: GridConvention::NoPattern,
            positions: BTreeMap::new(),
            warnings,
        }
    }
}

/// Distinct labels with numeric labels ordered by value, then the rest alphabetically
pub fn sort_labels(labels: impl IntoIterator<Item = String>) -> Vec<String> {
    let distinct: BTreeSet<String> = labels.into_iter().collect();
    let mut sorted: Vec<String> = distinct.into_iter().collect();
    sorted.sort_by(|a, b| match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    });
    sorted
}
