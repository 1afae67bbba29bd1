//! Parsing statistics for DEX reads
//!
//! Summarizes a [`DexReadResult`] for reports and the CLI progress output.

use serde::{Deserialize, Serialize};

use crate::app::models::{DexReadResult, IssueKind, RecordType};

/// Simple parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Total number of records (one per tokenized line)
    pub total_records: usize,

    /// Records with a typed payload
    pub records_mapped: usize,

    /// Recognized records whose fields could not be typed
    pub records_failed: usize,

    /// Records with an unrecognized tag
    pub unknown_records: usize,

    /// Distinct selections after consolidation
    pub selections: usize,

    /// Issues of every kind
    pub issues: usize,

    /// Issues that are not warnings
    pub errors: usize,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate success rate as a percentage of recognized records
    pub fn success_rate(&self) -> f64 {
        let recognized = self.total_records - self.unknown_records;
        if recognized == 0 {
            0.0
        } else {
            (self.records_mapped as f64 / recognized as f64) * 100.0
        }
    }

    /// Check if parsing was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }
}

impl DexReadResult {
    /// Statistics for this read
    pub fn stats(&self) -> ParseStats {
        let unknown_records = self
            .records
            .iter()
            .filter(|r| r.record_type == RecordType::Unknown)
            .count();

        ParseStats {
            total_records: self.records.len(),
            records_mapped: self.records.iter().filter(|r| r.payload.is_some()).count(),
            records_failed: self.records.iter().filter(|r| r.is_failed()).count(),
            unknown_records,
            selections: self.selections.len(),
            issues: self.issues.len(),
            errors: self.issues.iter().filter(|i| !i.kind.is_warning()).count(),
        }
    }

    /// Number of issues of one kind
    pub fn issue_count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }
}
