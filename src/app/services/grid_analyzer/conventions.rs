//! Selection numbering conventions
//!
//! Each convention is a whole-set hypothesis over the selection codes of one
//! machine: it is accepted only if it places every code and no two codes land
//! on the same position.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::app::models::{GridConvention, GridPosition};

/// Conventions in the order they are tried
pub const CONVENTION_PRIORITY: &[GridConvention] = &[
    GridConvention::AlphaRowNumericColumn,
    GridConvention::NumericRowAlphaColumn,
    GridConvention::NumericRowTimesTen,
    GridConvention::NumericRowTimesHundred,
    GridConvention::FlatSequential,
];

/// Result of testing one convention against a set of codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConventionAttempt {
    /// Every code placed without collision
    Accepted(BTreeMap<String, GridPosition>),
    /// A code does not have the shape this convention expects
    Inapplicable { code: String },
    /// Two codes map to the same position
    Collision {
        first: String,
        second: String,
        position: GridPosition,
    },
    /// Codes fit the convention but it needs a column count
    MissingHint,
}

fn alpha_row_re() -> &'static Regex {
    static ALPHA_ROW_RE: OnceLock<Regex> = OnceLock::new();
    ALPHA_ROW_RE
        .get_or_init(|| Regex::new(r"^([A-Za-z])([0-9]{1,2})$").expect("valid alpha row regex"))
}

fn numeric_row_alpha_re() -> &'static Regex {
    static NUMERIC_ROW_ALPHA_RE: OnceLock<Regex> = OnceLock::new();
    NUMERIC_ROW_ALPHA_RE.get_or_init(|| {
        Regex::new(r"^([0-9]{1,2})([A-Za-z])$").expect("valid numeric row regex")
    })
}

fn times_ten_re() -> &'static Regex {
    static TIMES_TEN_RE: OnceLock<Regex> = OnceLock::new();
    TIMES_TEN_RE.get_or_init(|| Regex::new(r"^[1-9][1-9]$").expect("valid times ten regex"))
}

fn times_hundred_re() -> &'static Regex {
    static TIMES_HUNDRED_RE: OnceLock<Regex> = OnceLock::new();
    TIMES_HUNDRED_RE
        .get_or_init(|| Regex::new(r"^[1-9][0-9]{2,3}$").expect("valid times hundred regex"))
}

fn flat_re() -> &'static Regex {
    static FLAT_RE: OnceLock<Regex> = OnceLock::new();
    FLAT_RE.get_or_init(|| Regex::new(r"^([A-Za-z]*)([0-9]+)$").expect("valid flat index regex"))
}

/// Strip leading zeros from a digit run, keeping a single "0"
fn number_label(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Place a single code under a convention that needs no whole-set context
fn place(convention: GridConvention, code: &str) -> Option<GridPosition> {
    match convention {
        GridConvention::AlphaRowNumericColumn => {
            let captures = alpha_row_re().captures(code)?;
            Some(GridPosition::new(
                captures[1].to_uppercase(),
                number_label(&captures[2]),
            ))
        }
        GridConvention::NumericRowAlphaColumn => {
            let captures = numeric_row_alpha_re().captures(code)?;
            Some(GridPosition::new(
                number_label(&captures[1]),
                captures[2].to_uppercase(),
            ))
        }
        GridConvention::NumericRowTimesTen => {
            if !times_ten_re().is_match(code) {
                return None;
            }
            let n: u32 = code.parse().ok()?;
            Some(GridPosition::new((n / 10).to_string(), (n % 10).to_string()))
        }
        GridConvention::NumericRowTimesHundred => {
            if !times_hundred_re().is_match(code) {
                return None;
            }
            let n: u32 = code.parse().ok()?;
            if n % 100 == 0 {
                return None;
            }
            Some(GridPosition::new((n / 100).to_string(), (n % 100).to_string()))
        }
        GridConvention::FlatSequential | GridConvention::NoPattern => None,
    }
}

/// Test a convention against every code
pub fn assign(
    convention: GridConvention,
    codes: &[&str],
    column_hint: Option<u32>,
) -> ConventionAttempt {
    let placed = match convention {
        GridConvention::FlatSequential => match place_flat(codes, column_hint) {
            Ok(placed) => placed,
            Err(attempt) => return attempt,
        },
        GridConvention::NoPattern => Vec::new(),
        _ => {
            let mut placed = Vec::with_capacity(codes.len());
            for code in codes {
                match place(convention, code) {
                    Some(position) => placed.push((code.to_string(), position)),
                    None => {
                        return ConventionAttempt::Inapplicable {
                            code: code.to_string(),
                        };
                    }
                }
            }
            placed
        }
    };

    let mut occupied: BTreeMap<GridPosition, String> = BTreeMap::new();
    let mut positions = BTreeMap::new();
    for (code, position) in placed {
        if let Some(first) = occupied.get(&position) {
            return ConventionAttempt::Collision {
                first: first.clone(),
                second: code,
                position,
            };
        }
        occupied.insert(position.clone(), code.clone());
        positions.insert(code, position);
    }

    ConventionAttempt::Accepted(positions)
}

/// Fold flat indices into rows of `column_hint` columns
fn place_flat(
    codes: &[&str],
    column_hint: Option<u32>,
) -> Result<Vec<(String, GridPosition)>, ConventionAttempt> {
    let mut prefix: Option<String> = None;
    let mut indices = Vec::with_capacity(codes.len());

    for code in codes {
        let inapplicable = || ConventionAttempt::Inapplicable {
            code: code.to_string(),
        };

        let captures = flat_re().captures(code).ok_or_else(inapplicable)?;
        let code_prefix = captures[1].to_uppercase();
        let expected = prefix.get_or_insert_with(|| code_prefix.clone());
        if *expected != code_prefix {
            return Err(inapplicable());
        }

        let index: u64 = captures[2].parse().map_err(|_| inapplicable())?;
        if index == 0 {
            return Err(inapplicable());
        }
        indices.push((code.to_string(), index));
    }

    let columns = column_hint
        .filter(|columns| *columns > 0)
        .map(u64::from)
        .ok_or(ConventionAttempt::MissingHint)?;

    Ok(indices
        .into_iter()
        .map(|(code, index)| {
            let zero_based = index - 1;
            let position = GridPosition::new(
                (zero_based / columns + 1).to_string(),
                (zero_based % columns + 1).to_string(),
            );
            (code, position)
        })
        .collect())
}
