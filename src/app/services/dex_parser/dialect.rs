//! Manufacturer dialect resolution
//!
//! The dialect must be known before any field is mapped, because the same
//! segment tag can carry different element orders and money units depending
//! on who built the controller.

use tracing::debug;

use super::classifier::ClassifiedLine;
use crate::app::models::Dialect;
use crate::constants::{DEFAULT_IDENTIFICATION_SCAN_LIMIT, IDENTIFICATION_SOURCES, MANUFACTURER_CODES};

/// Outcome of dialect resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectResolution {
    pub dialect: Dialect,
    /// Matched manufacturer code, `None` when falling back to generic
    pub manufacturer_code: Option<String>,
    /// Line the code was read from
    pub source_line: Option<usize>,
}

impl DialectResolution {
    fn generic() -> Self {
        Self {
            dialect: Dialect::Generic,
            manufacturer_code: None,
            source_line: None,
        }
    }

    /// Whether a manufacturer code was recognized
    pub fn is_identified(&self) -> bool {
        self.manufacturer_code.is_some()
    }
}

/// Resolves the dialect from identification records near the start of a file
#[derive(Debug, Clone)]
pub struct DialectResolver {
    scan_limit: usize,
    aliases: Vec<(String, Dialect)>,
}

impl Default for DialectResolver {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTIFICATION_SCAN_LIMIT)
    }
}

impl DialectResolver {
    /// Create a resolver that inspects the first `scan_limit` lines
    pub fn new(scan_limit: usize) -> Self {
        Self {
            scan_limit,
            aliases: Vec::new(),
        }
    }

    /// Add manufacturer codes on top of the built-in table
    pub fn with_aliases(mut self, aliases: Vec<(String, Dialect)>) -> Self {
        self.aliases = aliases
            .into_iter()
            .map(|(code, dialect)| (code.trim().to_uppercase(), dialect))
            .filter(|(code, _)| !code.is_empty())
            .collect();
        self
    }

    /// Determine the dialect for a classified file
    pub fn resolve(&self, lines: &[ClassifiedLine]) -> DialectResolution {
        for line in lines
            .iter()
            .take_while(|line| line.line_number() <= self.scan_limit)
        {
            for (record_type, position) in IDENTIFICATION_SOURCES {
                if line.record_type != *record_type {
                    continue;
                }

                let Some(value) = line.field(*position) else {
                    continue;
                };

                if let Some((code, dialect)) = self.match_code(value) {
                    debug!(
                        "Resolved dialect {} from manufacturer code '{}' on line {}",
                        dialect,
                        code,
                        line.line_number()
                    );
                    return DialectResolution {
                        dialect,
                        manufacturer_code: Some(code),
                        source_line: Some(line.line_number()),
                    };
                }
            }
        }

        DialectResolution::generic()
    }

    /// Match the alphabetic prefix of a field against known manufacturer codes
    ///
    /// The longest matching code wins; built-in codes win ties with aliases.
    pub fn match_code(&self, value: &str) -> Option<(String, Dialect)> {
        let prefix = manufacturer_prefix(value)?;

        MANUFACTURER_CODES
            .iter()
            .map(|(code, dialect)| (code.to_string(), *dialect))
            .chain(self.aliases.iter().cloned())
            .filter(|(code, _)| prefix.starts_with(code.as_str()))
            .fold(None, |best: Option<(String, Dialect)>, candidate| match best {
                Some(current) if current.0.len() >= candidate.0.len() => Some(current),
                _ => Some(candidate),
            })
    }
}

/// Leading alphabetic run of a field, upper-cased
pub fn manufacturer_prefix(value: &str) -> Option<String> {
    let prefix: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if prefix.is_empty() { None } else { Some(prefix) }
}
