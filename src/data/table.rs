//! Prepared Table
//! Column names, the typed row view and read-only queries over prepared data.

use polars::prelude::*;
use serde::Serialize;

pub const COMPANY: &str = "company";
pub const COUNTRY: &str = "country";
pub const VERTICAL: &str = "vertical";
pub const STATUS: &str = "status";
pub const RAISED_USD: &str = "raised_usd";
pub const VALUATION_USD: &str = "valuation_usd";
pub const UNICORN_MONTH: &str = "unicorn_month";
pub const UNICORN_YEAR: &str = "unicorn_year";

/// Columns the source file must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COMPANY,
    COUNTRY,
    VERTICAL,
    STATUS,
    RAISED_USD,
    VALUATION_USD,
    UNICORN_MONTH,
];

/// One prepared row, as shown in the records table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedRecord {
    pub company: String,
    pub country: String,
    pub vertical: String,
    pub status: String,
    pub raised_usd: f64,
    pub valuation_usd: f64,
    pub unicorn_year: Option<i32>,
}

/// Totals shown above the charts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub unicorns: usize,
    pub valuation_usd: f64,
    pub raised_usd: f64,
}

impl Totals {
    pub fn of(df: &DataFrame) -> PolarsResult<Self> {
        Ok(Self {
            unicorns: df.height(),
            valuation_usd: df.column(VALUATION_USD)?.f64()?.sum().unwrap_or(0.0),
            raised_usd: df.column(RAISED_USD)?.f64()?.sum().unwrap_or(0.0),
        })
    }
}

/// Convert a prepared frame into typed rows.
pub fn records(df: &DataFrame) -> PolarsResult<Vec<PreparedRecord>> {
    let company = df.column(COMPANY)?.str()?;
    let country = df.column(COUNTRY)?.str()?;
    let vertical = df.column(VERTICAL)?.str()?;
    let status = df.column(STATUS)?.str()?;
    let raised = df.column(RAISED_USD)?.f64()?;
    let valuation = df.column(VALUATION_USD)?.f64()?;
    let year = df.column(UNICORN_YEAR)?.i32()?;

    let text = |ca: &StringChunked, i: usize| ca.get(i).unwrap_or_default().to_string();

    Ok((0..df.height())
        .map(|i| PreparedRecord {
            company: text(company, i),
            country: text(country, i),
            vertical: text(vertical, i),
            status: text(status, i),
            raised_usd: raised.get(i).unwrap_or(0.0),
            valuation_usd: valuation.get(i).unwrap_or(0.0),
            unicorn_year: year.get(i),
        })
        .collect())
}

/// Sorted distinct non-null values of a text column.
pub fn distinct_values(df: &DataFrame, column: &str) -> Vec<String> {
    let Ok(ca) = df.column(column).and_then(|c| c.str()) else {
        return Vec::new();
    };
    let mut values: Vec<String> = ca
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    values.sort();
    values.dedup();
    values
}

/// Smallest and largest unicorn year, ignoring nulls.
pub fn year_bounds(df: &DataFrame) -> Option<(i32, i32)> {
    let years = df.column(UNICORN_YEAR).ok()?.i32().ok()?;
    Some((years.min()?, years.max()?))
}
