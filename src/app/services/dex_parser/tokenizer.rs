//! Segment tokenizer for DEX text
//!
//! Splits raw file text into logical lines and each line into a type tag and
//! ordered element tokens.

use crate::app::models::{IssueKind, ParseIssue};

/// One non-empty input line split into tag and elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedLine {
    /// 1-based line number in the source text
    pub line_number: usize,
    /// Segment tag (first token)
    pub tag: String,
    /// Element tokens after the tag; position 1 is `fields[0]`
    pub fields: Vec<String>,
    /// Whether the line ended with a delimiter
    pub trailing_delimiter: bool,
}

impl TokenizedLine {
    /// Element at a 1-based DEX position, `None` if the line is too short
    pub fn field(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.fields.get(index))
            .map(String::as_str)
    }
}

/// Lines produced by the tokenizer plus structural issues for skipped lines
#[derive(Debug, Clone, Default)]
pub struct TokenizeOutcome {
    pub lines: Vec<TokenizedLine>,
    pub issues: Vec<ParseIssue>,
}

/// Tokenize DEX text on `\n` / `\r\n` line terminators and the given delimiter
pub fn tokenize(text: &str, delimiter: char) -> TokenizeOutcome {
    let raw_lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    // Trailing empty lines are not content
    let mut end = raw_lines.len();
    while end > 0 && raw_lines[end - 1].trim().is_empty() {
        end -= 1;
    }

    let mut outcome = TokenizeOutcome::default();

    for (index, raw) in raw_lines[..end].iter().enumerate() {
        let line_number = index + 1;
        match tokenize_line(raw, line_number, delimiter) {
            Some(line) => outcome.lines.push(line),
            None => outcome.issues.push(
                ParseIssue::new(IssueKind::Structural, "line has no segment tag")
                    .at_line(line_number),
            ),
        }
    }

    outcome
}

/// Tokenize a single line; `None` when no tag remains after trimming
pub fn tokenize_line(raw: &str, line_number: usize, delimiter: char) -> Option<TokenizedLine> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut tokens: Vec<String> = trimmed
        .split(delimiter)
        .map(|token| token.trim().to_string())
        .collect();

    let trailing_delimiter = tokens.len() > 1 && tokens.last().is_some_and(|t| t.is_empty());
    if trailing_delimiter {
        tokens.pop();
    }

    let tag = tokens.remove(0);
    if tag.is_empty() {
        return None;
    }

    Some(TokenizedLine {
        line_number,
        tag,
        fields: tokens,
        trailing_delimiter,
    })
}
