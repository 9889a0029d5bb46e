//! Filter Application
//! Country / industry / year-range selection over a prepared table.

use super::table::{year_bounds, COUNTRY, UNICORN_YEAR, VERTICAL};
use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Year range {min}-{max} is inverted")]
    InvertedRange { min: i32, max: i32 },
}

/// Label of the "match everything" dropdown entry.
pub const ALL: &str = "All";

/// Dropdown selection: every row, or rows equal to one value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// Map a dropdown label back to a choice.
    pub fn from_label(label: &str) -> Self {
        if label == ALL {
            Choice::All
        } else {
            Choice::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Choice::All => ALL,
            Choice::Only(value) => value,
        }
    }

    fn predicate(&self, column: &str) -> Option<Expr> {
        match self {
            Choice::All => None,
            Choice::Only(value) => Some(col(column).eq(lit(value.as_str()))),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive range of unicorn years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// The full year span of `df`, if it has any non-null year.
    pub fn spanning(df: &DataFrame) -> Option<Self> {
        year_bounds(df).map(|(min, max)| Self { min, max })
    }

    /// Null years compare as null, so the filter drops them.
    fn predicate(&self) -> Expr {
        col(UNICORN_YEAR)
            .gt_eq(lit(self.min))
            .and(col(UNICORN_YEAR).lt_eq(lit(self.max)))
    }
}

/// The three user-adjustable filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSelection {
    pub country: Choice,
    pub industry: Choice,
    pub years: YearRange,
}

impl FilterSelection {
    /// Everything selected over the given year span.
    pub fn all(years: YearRange) -> Self {
        Self {
            country: Choice::All,
            industry: Choice::All,
            years,
        }
    }
}

/// Return the rows of `df` that pass every filter in `selection`.
pub fn apply_filters(df: &DataFrame, selection: &FilterSelection) -> Result<DataFrame, FilterError> {
    let YearRange { min, max } = selection.years;
    if min > max {
        return Err(FilterError::InvertedRange { min, max });
    }

    let predicate = [
        selection.country.predicate(COUNTRY),
        selection.industry.predicate(VERTICAL),
        Some(selection.years.predicate()),
    ]
    .into_iter()
    .flatten()
    .reduce(|acc, expr| acc.and(expr))
    .unwrap_or_else(|| lit(true));

    let filtered = df.clone().lazy().filter(predicate).collect()?;
    log::debug!(
        "Filters {} / {} / {}-{} kept {} of {} rows",
        selection.country,
        selection.industry,
        selection.years.min,
        selection.years.max,
        filtered.height(),
        df.height()
    );
    Ok(filtered)
}
