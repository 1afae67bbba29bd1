//! Issue records collected while reading a DEX file
//!
//! Every line-level and file-level problem becomes a [`ParseIssue`]. Only
//! [`IssueKind::Structural`] issues can fail a read, and only when no record
//! could be produced at all.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a parse issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// Line or input could not be tokenized
    Structural,
    /// Segment tag not present in the classification table
    UnknownRecord,
    /// Recognized segment whose fields could not be typed
    MappingFailure,
    /// Informational finding from selection consolidation
    ConsolidationWarning,
    /// Grid layout could not be inferred or needed a missing hint
    GridInferenceWarning,
    /// Manufacturer could not be identified; generic layout used
    DialectWarning,
    /// Envelope counts or markers are inconsistent
    IntegrityWarning,
}

impl IssueKind {
    /// Whether this kind is a warning rather than an error
    pub fn is_warning(&self) -> bool {
        !matches!(self, IssueKind::Structural | IssueKind::MappingFailure)
    }

    /// Short label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::Structural => "structural",
            IssueKind::UnknownRecord => "unknown-record",
            IssueKind::MappingFailure => "mapping-failure",
            IssueKind::ConsolidationWarning => "consolidation-warning",
            IssueKind::GridInferenceWarning => "grid-inference-warning",
            IssueKind::DialectWarning => "dialect-warning",
            IssueKind::IntegrityWarning => "integrity-warning",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One problem found while reading a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    /// 1-based source line; `None` for file-level issues
    pub line_number: Option<usize>,
    /// 1-based element position after the tag, when a single field is at fault
    pub field_index: Option<usize>,
    pub kind: IssueKind,
    pub message: String,
}

impl ParseIssue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            line_number: None,
            field_index: None,
            kind,
            message: message.into(),
        }
    }

    /// Attach the originating line
    pub fn at_line(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }

    /// Attach the offending element position
    pub fn at_field(mut self, field_index: usize) -> Self {
        self.field_index = Some(field_index);
        self
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line_number, self.field_index) {
            (Some(line), Some(field)) => {
                write!(f, "[{}] line {}, field {}: {}", self.kind, line, field, self.message)
            }
            (Some(line), None) => write!(f, "[{}] line {}: {}", self.kind, line, self.message),
            _ => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}
