//! Currency Normalization
//! Rule engine turning "$500M" / "$1.5B" / "N/A" text into billions of dollars.

use super::reference::{BILLION, CURRENCY_RULES};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataFormatError {
    #[error("Invalid currency amount {raw:?} (rewritten as {rewritten:?})")]
    InvalidAmount { raw: String, rewritten: String },
}

/// Apply the substitution rules in order, each on its first occurrence.
pub fn apply_rules(raw: &str) -> String {
    CURRENCY_RULES
        .iter()
        .fold(raw.trim().to_string(), |text, (pattern, replacement)| {
            text.replacen(pattern, replacement, 1)
        })
}

/// Parse a currency string into billions of dollars.
pub fn parse_billions(raw: &str) -> Result<f64, DataFormatError> {
    let rewritten = apply_rules(raw);
    match rewritten.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value / BILLION),
        _ => Err(DataFormatError::InvalidAmount {
            raw: raw.to_string(),
            rewritten,
        }),
    }
}

/// Normalize a cell, treating empty and malformed values as zero.
///
/// Returns the value and whether the fallback was taken for a non-empty cell.
pub fn billions_or_zero(raw: Option<&str>) -> (f64, bool) {
    match raw {
        None => (0.0, false),
        Some(text) if text.trim().is_empty() => (0.0, false),
        Some(text) => match parse_billions(text) {
            Ok(value) => (value, false),
            Err(e) => {
                log::debug!("{e}; using 0");
                (0.0, true)
            }
        },
    }
}
