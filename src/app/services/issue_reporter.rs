//! Ordered accumulation of parse issues
//!
//! Components report problems here instead of returning errors, so one bad
//! line never stops extraction of the rest of the file.

use tracing::debug;

use crate::app::models::{IssueKind, ParseIssue};

/// Collects issues from every pipeline stage in the order they are found
#[derive(Debug, Default, Clone)]
pub struct IssueReporter {
    issues: Vec<ParseIssue>,
}

impl IssueReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an already-built issue
    pub fn report(&mut self, issue: ParseIssue) {
        debug!("{}", issue);
        self.issues.push(issue);
    }

    /// Record a line-level issue
    pub fn line(&mut self, kind: IssueKind, line_number: usize, message: impl Into<String>) {
        self.report(ParseIssue::new(kind, message).at_line(line_number));
    }

    /// Record a field-level issue
    pub fn field(
        &mut self,
        kind: IssueKind,
        line_number: usize,
        field_index: usize,
        message: impl Into<String>,
    ) {
        self.report(
            ParseIssue::new(kind, message)
                .at_line(line_number)
                .at_field(field_index),
        );
    }

    /// Record a file-level issue
    pub fn file(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.report(ParseIssue::new(kind, message));
    }

    /// Append issues produced by a post-pass
    pub fn extend(&mut self, issues: impl IntoIterator<Item = ParseIssue>) {
        for issue in issues {
            self.report(issue);
        }
    }

    /// Number of issues of a given kind
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Consume the reporter, yielding issues in report order
    pub fn into_issues(self) -> Vec<ParseIssue> {
        self.issues
    }
}
