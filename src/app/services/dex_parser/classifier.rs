//! Record classification against the closed tag table
//!
//! Unknown tags are not errors: vendor extension segments are common and are
//! kept as [`RecordType::Unknown`] so coverage gaps stay auditable.

use super::tokenizer::TokenizedLine;
use crate::app::models::RecordType;
use crate::constants::{RECORD_TAGS, SPLIT_TAG_FAMILIES};

/// A tokenized line with its record type resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub line: TokenizedLine,
    pub record_type: RecordType,
    /// Whether the subtype was taken from a separate element
    pub split_subtype: bool,
}

impl ClassifiedLine {
    pub fn line_number(&self) -> usize {
        self.line.line_number
    }

    /// Element at a 1-based position (after any consumed subtype element)
    pub fn field(&self, position: usize) -> Option<&str> {
        self.line.field(position)
    }
}

/// Look up a tag in the classification table
pub fn lookup_tag(tag: &str) -> Option<RecordType> {
    RECORD_TAGS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(tag))
        .map(|(_, record_type)| *record_type)
}

/// Classify one tokenized line
pub fn classify(mut line: TokenizedLine) -> ClassifiedLine {
    if let Some(record_type) = lookup_tag(&line.tag) {
        return ClassifiedLine {
            line,
            record_type,
            split_subtype: false,
        };
    }

    if let Some(record_type) = lookup_split_tag(&line) {
        line.fields.remove(0);
        return ClassifiedLine {
            line,
            record_type,
            split_subtype: true,
        };
    }

    ClassifiedLine {
        line,
        record_type: RecordType::Unknown,
        split_subtype: false,
    }
}

/// Resolve `PA*1*...` style lines where the subtype is its own element
fn lookup_split_tag(line: &TokenizedLine) -> Option<RecordType> {
    let is_family = SPLIT_TAG_FAMILIES
        .iter()
        .any(|family| family.eq_ignore_ascii_case(&line.tag));
    if !is_family {
        return None;
    }

    let subtype = line.field(1)?;
    if subtype.len() != 1 || !subtype.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    lookup_tag(&format!("{}{}", line.tag, subtype))
}
