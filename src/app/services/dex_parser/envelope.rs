//! Transmission envelope integrity checks
//!
//! Compares the DXS/ST/SE/DXE framing against what the file actually contains.
//! Every finding is an integrity warning; none of them stop extraction.

use crate::app::models::{IssueKind, ParseIssue, ParsedRecord, RecordPayload, RecordType};

/// Check envelope markers and declared counts
pub fn check_envelope(records: &[ParsedRecord]) -> Vec<ParseIssue> {
    let mut issues = Vec::new();
    if records.is_empty() {
        return issues;
    }

    if !records.iter().any(|r| r.record_type == RecordType::StreamStart) {
        issues.push(ParseIssue::new(
            IssueKind::IntegrityWarning,
            "missing DXS stream header",
        ));
    }

    let stream_end = records
        .iter()
        .rev()
        .find(|r| r.record_type == RecordType::StreamEnd);
    if stream_end.is_none() {
        issues.push(ParseIssue::new(
            IssueKind::IntegrityWarning,
            "missing DXE stream trailer",
        ));
    }

    let mut open_set: Option<(usize, usize)> = None; // (line number, segments so far)
    let mut completed_sets = 0i64;

    for record in records {
        match record.record_type {
            RecordType::TransactionHeader => {
                if let Some((line, _)) = open_set {
                    issues.push(
                        ParseIssue::new(
                            IssueKind::IntegrityWarning,
                            format!("transaction set opened on line {} has no SE trailer", line),
                        )
                        .at_line(line),
                    );
                }
                open_set = Some((record.line_number, 1));
            }
            RecordType::TransactionTrailer => {
                let Some((_, segments)) = open_set.take() else {
                    issues.push(
                        ParseIssue::new(IssueKind::IntegrityWarning, "SE trailer without ST header")
                            .at_line(record.line_number),
                    );
                    continue;
                };
                completed_sets += 1;

                let counted = segments + 1;
                if let Some(RecordPayload::TransactionTrailer(trailer)) = &record.payload {
                    if let Some(declared) = trailer.segment_count {
                        if declared != counted as i64 {
                            issues.push(
                                ParseIssue::new(
                                    IssueKind::IntegrityWarning,
                                    format!(
                                        "SE declares {} segments but the set contains {}",
                                        declared, counted
                                    ),
                                )
                                .at_line(record.line_number)
                                .at_field(1),
                            );
                        }
                    }
                }
            }
            _ => {
                if let Some((_, segments)) = open_set.as_mut() {
                    *segments += 1;
                }
            }
        }
    }

    if let Some((line, _)) = open_set {
        issues.push(
            ParseIssue::new(
                IssueKind::IntegrityWarning,
                format!("transaction set opened on line {} has no SE trailer", line),
            )
            .at_line(line),
        );
    }

    if let Some(trailer_record) = stream_end {
        if let Some(RecordPayload::StreamTrailer(trailer)) = &trailer_record.payload {
            if let Some(declared) = trailer.set_count {
                if declared != completed_sets {
                    issues.push(
                        ParseIssue::new(
                            IssueKind::IntegrityWarning,
                            format!(
                                "DXE declares {} transaction sets but {} were found",
                                declared, completed_sets
                            ),
                        )
                        .at_line(trailer_record.line_number)
                        .at_field(2),
                    );
                }
            }
        }
    }

    issues
}
