//! Year Breakdown Specs
//! Unicorns per year, stacked by a categorical column.

use super::bar::{ensure_column, ChartError, UNKNOWN_GROUP};
use crate::data::table::UNICORN_YEAR;
use polars::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// One stack layer: a category and its count for each year of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSeries {
    pub name: String,
    /// Aligned with [`YearBreakdownSpec::years`].
    pub counts: Vec<f64>,
}

impl YearSeries {
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }
}

/// Stacked vertical bars with one column per unicorn year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearBreakdownSpec {
    pub title: String,
    pub color_by: String,
    /// Ascending, only years present in the data.
    pub years: Vec<i32>,
    /// Largest total first, ties in first-seen order.
    pub series: Vec<YearSeries>,
}

impl YearBreakdownSpec {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Height of the tallest stacked column.
    pub fn max_stack(&self) -> f64 {
        (0..self.years.len())
            .map(|i| self.series.iter().map(|s| s.counts[i]).sum::<f64>())
            .fold(0.0, f64::max)
    }
}

const PAIR_COUNT: &str = "__pair_count";

/// Count rows per (unicorn year, `color_by`) pair. Rows without a year are skipped.
pub fn build_year_breakdown(
    df: &DataFrame,
    color_by: &str,
    title: &str,
) -> Result<YearBreakdownSpec, ChartError> {
    ensure_column(df, UNICORN_YEAR)?;
    ensure_column(df, color_by)?;

    // Stable grouping keeps categories in first-seen order among dated rows.
    let pairs = df
        .clone()
        .lazy()
        .filter(col(UNICORN_YEAR).is_not_null())
        .group_by_stable([
            col(UNICORN_YEAR).cast(DataType::Int32),
            col(color_by)
                .cast(DataType::String)
                .fill_null(lit(UNKNOWN_GROUP)),
        ])
        .agg([len().cast(DataType::Float64).alias(PAIR_COUNT)])
        .collect()?;

    let pair_years = pairs.column(UNICORN_YEAR)?.i32()?;
    let pair_names = pairs.column(color_by)?.str()?;
    let pair_counts = pairs.column(PAIR_COUNT)?.f64()?;

    let years: Vec<i32> = pair_years
        .into_iter()
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let column_of: HashMap<i32, usize> = years.iter().enumerate().map(|(i, &y)| (y, i)).collect();

    let mut series: Vec<YearSeries> = Vec::new();
    for ((year, name), count) in pair_years.into_iter().zip(pair_names).zip(pair_counts) {
        let (Some(year), Some(count)) = (year, count) else {
            continue;
        };
        let name = name.unwrap_or(UNKNOWN_GROUP);
        let index = match series.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                series.push(YearSeries {
                    name: name.to_string(),
                    counts: vec![0.0; years.len()],
                });
                series.len() - 1
            }
        };
        series[index].counts[column_of[&year]] = count;
    }
    series.sort_by(|a, b| b.total().total_cmp(&a.total()));

    log::debug!(
        "Built '{title}' by {color_by}: {} years, {} series",
        years.len(),
        series.len()
    );

    Ok(YearBreakdownSpec {
        title: title.to_string(),
        color_by: color_by.to_string(),
        years,
        series,
    })
}
