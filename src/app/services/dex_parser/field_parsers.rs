//! Field parsing utilities for DEX elements
//!
//! Typed conversions for the three element kinds found in DEX segments. All
//! money values end up as integer cents; no floating point is involved.

use thiserror::Error;

/// How a dialect reports money amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoneyUnit {
    /// Integer minor units (`150` is 1.50)
    Cents,
    /// Whole currency units with up to two decimals (`1.5` is 1.50)
    WholeUnits,
}

/// Why a single element could not be typed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldParseError {
    #[error("invalid count '{0}'")]
    InvalidCount(String),

    #[error("negative count '{0}'")]
    NegativeCount(String),

    #[error("invalid money amount '{0}'")]
    InvalidMoney(String),

    #[error("money amount '{0}' has more than two decimal places")]
    TooManyDecimals(String),

    #[error("value '{0}' is out of range")]
    OutOfRange(String),
}

/// Parse a count element; blank tokens are zero
pub fn parse_count(token: &str) -> Result<i64, FieldParseError> {
    let value = token.trim();
    if value.is_empty() {
        return Ok(0);
    }

    if value.starts_with('-') {
        return Err(FieldParseError::NegativeCount(value.to_string()));
    }

    if !value.chars().all(|c| c.is_ascii_digit() || c == '+') {
        return Err(FieldParseError::InvalidCount(value.to_string()));
    }

    value
        .parse::<i64>()
        .map_err(|_| FieldParseError::InvalidCount(value.to_string()))
}

/// Parse a money element into cents; blank tokens are zero
pub fn parse_money(token: &str, unit: MoneyUnit) -> Result<i64, FieldParseError> {
    let value = token.trim();
    if value.is_empty() {
        return Ok(0);
    }

    match unit {
        MoneyUnit::Cents => {
            if !value.chars().all(|c| c.is_ascii_digit()) {
                return Err(FieldParseError::InvalidMoney(value.to_string()));
            }
            value
                .parse::<i64>()
                .map_err(|_| FieldParseError::OutOfRange(value.to_string()))
        }
        MoneyUnit::WholeUnits => parse_whole_units(value),
    }
}

/// Parse an optional text element; blank tokens are `None`
pub fn parse_text(token: &str) -> Option<String> {
    let value = token.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_whole_units(value: &str) -> Result<i64, FieldParseError> {
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (value, ""),
    };

    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
        return Err(FieldParseError::InvalidMoney(value.to_string()));
    }

    if fraction.len() > 2 {
        return Err(FieldParseError::TooManyDecimals(value.to_string()));
    }

    let whole_cents = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<i64>()
            .ok()
            .and_then(|units| units.checked_mul(100))
            .ok_or_else(|| FieldParseError::OutOfRange(value.to_string()))?
    };

    // "5" means 50 cents, "05" means 5
    let fraction_cents = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().unwrap_or(0) * 10,
        _ => fraction.parse::<i64>().unwrap_or(0),
    };

    whole_cents
        .checked_add(fraction_cents)
        .ok_or_else(|| FieldParseError::OutOfRange(value.to_string()))
}
