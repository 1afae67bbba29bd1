//! Core DEX parser implementation
//!
//! Orchestrates the full pipeline for one file: tokenize, classify, resolve the
//! dialect, map fields, check the envelope, consolidate product activity and
//! infer the selection grid. [`DexParser::parse_str`] performs no I/O and is
//! deterministic for a given input and options.

use std::path::Path;
use tracing::{debug, info, warn};

use super::classifier::{ClassifiedLine, classify};
use super::dialect::DialectResolver;
use super::envelope::check_envelope;
use super::record_mapper::RecordMapper;
use super::tokenizer::tokenize;
use crate::app::models::{DexReadResult, Dialect, IssueKind, ParseIssue, ParsedRecord, RecordType};
use crate::app::services::grid_analyzer::GridAnalyzer;
use crate::app::services::issue_reporter::IssueReporter;
use crate::app::services::selection_consolidator::consolidate_records;
use crate::constants::{DEFAULT_FIELD_DELIMITER, DEFAULT_IDENTIFICATION_SCAN_LIMIT};
use crate::{Error, Result};

/// Options controlling a single parse
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Known number of columns, needed for flat sequential selection numbering
    pub column_hint: Option<u32>,
    pub delimiter: char,
    /// Lines inspected for a manufacturer code
    pub identification_scan_limit: usize,
    /// Extra manufacturer codes consulted after the built-in table
    pub manufacturer_aliases: Vec<(String, Dialect)>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            column_hint: None,
            delimiter: DEFAULT_FIELD_DELIMITER,
            identification_scan_limit: DEFAULT_IDENTIFICATION_SCAN_LIMIT,
            manufacturer_aliases: Vec::new(),
        }
    }
}

impl ParseOptions {
    pub fn with_column_hint(mut self, columns: u32) -> Self {
        self.column_hint = Some(columns);
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_scan_limit(mut self, lines: usize) -> Self {
        self.identification_scan_limit = lines;
        self
    }

    pub fn with_alias(mut self, code: impl Into<String>, dialect: Dialect) -> Self {
        self.manufacturer_aliases.push((code.into(), dialect));
        self
    }
}

/// DEX audit file parser
#[derive(Debug, Clone, Default)]
pub struct DexParser {
    options: ParseOptions,
}

impl DexParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Read and parse a DEX file from disk
    pub async fn parse_file(&self, file_path: &Path) -> Result<DexReadResult> {
        info!("Parsing DEX file: {}", file_path.display());

        let text = read_source(file_path).await?;
        Ok(self.parse_str(&text))
    }

    /// Parse DEX text into records, selections, a grid summary and issues
    pub fn parse_str(&self, text: &str) -> DexReadResult {
        let mut reporter = IssueReporter::new();

        let tokenized = tokenize(text, self.options.delimiter);
        reporter.extend(tokenized.issues);

        if tokenized.lines.is_empty() {
            reporter.file(IssueKind::Structural, "input contains no DEX segments");
            warn!("No DEX segments found in input");
            return DexReadResult::failed(reporter.into_issues());
        }

        let classified: Vec<ClassifiedLine> = tokenized.lines.into_iter().map(classify).collect();

        let resolution = DialectResolver::new(self.options.identification_scan_limit)
            .with_aliases(self.options.manufacturer_aliases.clone())
            .resolve(&classified);
        if !resolution.is_identified() {
            reporter.file(
                IssueKind::DialectWarning,
                format!(
                    "no manufacturer code found in the first {} lines; using generic layout",
                    self.options.identification_scan_limit
                ),
            );
        }

        let records = self.map_records(&classified, resolution.dialect, &mut reporter);
        reporter.extend(check_envelope(&records));

        let consolidation = consolidate_records(&records);
        reporter.extend(consolidation.warnings);
        let mut selections = consolidation.selections;

        let grid = GridAnalyzer::new(self.options.column_hint)
            .analyze(selections.iter().map(|s| s.selection_code.as_str()));
        reporter.extend(grid.warnings.iter().cloned());

        for selection in &mut selections {
            selection.grid_position = grid.positions.get(&selection.selection_code).cloned();
        }

        debug!(
            "Parsed {} records into {} selections using {} dialect, grid {:?}",
            records.len(),
            selections.len(),
            resolution.dialect,
            grid.convention
        );

        DexReadResult {
            dialect: resolution.dialect,
            manufacturer_code: resolution.manufacturer_code,
            records,
            selections,
            grid: grid.summary(),
            success: true,
            issues: reporter.into_issues(),
        }
    }

    /// Map every classified line, reporting unknown records and failures
    fn map_records(
        &self,
        classified: &[ClassifiedLine],
        dialect: Dialect,
        reporter: &mut IssueReporter,
    ) -> Vec<ParsedRecord> {
        let mut mapper = RecordMapper::new(dialect);
        let mut records = Vec::with_capacity(classified.len());

        for line in classified {
            let mut record = ParsedRecord {
                record_type: line.record_type,
                line_number: line.line_number(),
                tag: line.line.tag.clone(),
                payload: None,
                error: None,
            };

            if line.record_type == RecordType::Unknown {
                reporter.line(
                    IssueKind::UnknownRecord,
                    line.line_number(),
                    format!("unrecognized segment tag '{}'", line.line.tag),
                );
                records.push(record);
                continue;
            }

            match mapper.map(line) {
                Ok(payload) => record.payload = payload,
                Err(failure) => {
                    let message = format!("{}: {}", line.record_type, failure.message);
                    let mut issue = ParseIssue::new(IssueKind::MappingFailure, message.clone())
                        .at_line(line.line_number());
                    if let Some(field_index) = failure.field_index {
                        issue = issue.at_field(field_index);
                    }
                    reporter.report(issue);
                    record.error = Some(message);
                }
            }

            records.push(record);
        }

        records
    }
}

/// Read a DEX file as text
///
/// Invalid UTF-8 is replaced rather than rejected; DEX exports are ASCII
/// in practice and a stray byte should cost one field, not the file.
pub async fn read_source(file_path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(file_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(file_path.display().to_string())
        } else {
            Error::io(format!("Failed to read file {}", file_path.display()), e)
        }
    })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
