//! Bar Chart Specs
//! Grouped aggregation of a prepared table into ordered horizontal bars.

use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Label used for rows whose grouping value is missing.
pub const UNKNOWN_GROUP: &str = "Unknown";

const AGG_VALUE: &str = "__aggregated_value";

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
}

/// Aggregation applied to the measure column within each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Row count; the measure column is ignored.
    Count,
    /// Arithmetic sum, nulls counted as zero.
    Sum,
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Count => f.write_str("count"),
            Aggregation::Sum => f.write_str("sum"),
        }
    }
}

/// One bar: a group and its aggregated value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarValue {
    pub label: String,
    pub value: f64,
}

/// A horizontal bar chart ready for rendering.
///
/// Bars are stored top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartSpec {
    pub title: String,
    pub group_by: String,
    pub measure: String,
    pub aggregation: Aggregation,
    /// Whether the category axis shows group names.
    pub show_labels: bool,
    pub bars: Vec<BarValue>,
}

impl BarChartSpec {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|b| b.value).fold(0.0, f64::max)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.bars.iter().map(|b| b.label.as_str()).collect()
    }

    /// Text drawn at the end of a bar.
    pub fn value_label(&self, value: f64) -> String {
        match self.aggregation {
            Aggregation::Count => format!("{value:.0}"),
            Aggregation::Sum => format!("{value:.2}"),
        }
    }

    /// Reorder bars to follow `reference`'s category order.
    ///
    /// Categories absent from `reference` keep their relative order at the end.
    /// Used when panels share one category axis.
    pub fn aligned_to(mut self, reference: &BarChartSpec) -> Self {
        let order = reference.labels();
        let rank = |label: &str| {
            order
                .iter()
                .position(|l| *l == label)
                .unwrap_or(usize::MAX)
        };
        self.bars.sort_by_key(|b| rank(&b.label));
        self
    }
}

/// Group `df` by `group_by` and aggregate `measure` per group.
///
/// Bars are ordered by value, descending; ties keep first-seen order.
pub fn build_bar_chart(
    df: &DataFrame,
    group_by: &str,
    measure: &str,
    aggregation: Aggregation,
    title: &str,
    show_labels: bool,
) -> Result<BarChartSpec, ChartError> {
    ensure_column(df, group_by)?;
    let value = match aggregation {
        Aggregation::Count => len().cast(DataType::Float64),
        Aggregation::Sum => {
            ensure_column(df, measure)?;
            col(measure)
                .cast(DataType::Float64)
                .fill_null(lit(0.0))
                .sum()
        }
    };

    let grouped = df
        .clone()
        .lazy()
        .group_by_stable([col(group_by)
            .cast(DataType::String)
            .fill_null(lit(UNKNOWN_GROUP))])
        .agg([value.alias(AGG_VALUE)])
        .collect()?;

    let labels = grouped.column(group_by)?.str()?;
    let values = grouped.column(AGG_VALUE)?.f64()?;

    let mut bars: Vec<BarValue> = labels
        .into_iter()
        .zip(values)
        .map(|(label, value)| BarValue {
            label: label.unwrap_or(UNKNOWN_GROUP).to_string(),
            value: value.unwrap_or(0.0),
        })
        .collect();
    // Stable sort keeps first-seen order among equal values.
    bars.sort_by(|a, b| b.value.total_cmp(&a.value));

    log::debug!(
        "Built '{title}': {aggregation}({measure}) by {group_by}, {} bars",
        bars.len()
    );

    Ok(BarChartSpec {
        title: title.to_string(),
        group_by: group_by.to_string(),
        measure: measure.to_string(),
        aggregation,
        show_labels,
        bars,
    })
}

pub(super) fn ensure_column(df: &DataFrame, name: &str) -> Result<(), ChartError> {
    if df.get_column_index(name).is_some() {
        Ok(())
    } else {
        Err(ChartError::UnknownColumn(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_labels(spec: &BarChartSpec) -> Vec<String> {
        spec.bars.iter().map(|b| b.label.clone()).collect()
    }

    #[test]
    fn test_count_ties_keep_first_seen_order() {
        // A: 3, B: 5, C: 5 with B seen before C.
        let groups = [
            "A", "B", "C", "B", "C", "A", "B", "C", "B", "C", "A", "B", "C",
        ];
        let df = df!("group" => groups, "company" => groups).unwrap();
        let spec = build_bar_chart(&df, "group", "company", Aggregation::Count, "n", true).unwrap();

        assert_eq!(spec_labels(&spec), vec!["B", "C", "A"]);
        assert_eq!(spec.bars[0].value, 5.0);
        assert_eq!(spec.bars[2].value, 3.0);
    }

    #[test]
    fn test_sum_per_group() {
        let df = df!(
            "country" => ["France", "France", "Spain"],
            "raised_usd" => [0.5, 1.5, 0.7],
        )
        .unwrap();
        let spec =
            build_bar_chart(&df, "country", "raised_usd", Aggregation::Sum, "Funding", false)
                .unwrap();

        assert_eq!(spec_labels(&spec), vec!["France", "Spain"]);
        assert!((spec.bars[0].value - 2.0).abs() < 1e-12);
        assert!(!spec.show_labels);
        assert_eq!(spec.title, "Funding");
    }

    #[test]
    fn test_sum_treats_nulls_as_zero() {
        let df = df!(
            "vertical" => ["AI", "AI", "SaaS"],
            "valuation_usd" => [Some(2.0), None, None],
        )
        .unwrap();
        let spec =
            build_bar_chart(&df, "vertical", "valuation_usd", Aggregation::Sum, "", true).unwrap();
        assert_eq!(spec.bars[0], BarValue { label: "AI".into(), value: 2.0 });
        assert_eq!(spec.bars[1], BarValue { label: "SaaS".into(), value: 0.0 });
    }

    #[test]
    fn test_null_group_is_unknown() {
        let df = df!("vertical" => [Some("AI"), None, None]).unwrap();
        let spec = build_bar_chart(&df, "vertical", "", Aggregation::Count, "", true).unwrap();
        assert_eq!(spec_labels(&spec), vec![UNKNOWN_GROUP, "AI"]);
    }

    #[test]
    fn test_empty_table_gives_empty_chart() {
        let df = df!("country" => Vec::<&str>::new(), "raised_usd" => Vec::<f64>::new()).unwrap();
        let spec =
            build_bar_chart(&df, "country", "raised_usd", Aggregation::Sum, "", true).unwrap();
        assert!(spec.is_empty());
        assert_eq!(spec.max_value(), 0.0);
    }

    #[test]
    fn test_unknown_columns() {
        let df = df!("country" => ["France"]).unwrap();
        assert!(matches!(
            build_bar_chart(&df, "nope", "", Aggregation::Count, "", true),
            Err(ChartError::UnknownColumn(c)) if c == "nope"
        ));
        assert!(matches!(
            build_bar_chart(&df, "country", "nope", Aggregation::Sum, "", true),
            Err(ChartError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_aligned_to_reference_order() {
        let reference = BarChartSpec {
            title: String::new(),
            group_by: "country".into(),
            measure: "company".into(),
            aggregation: Aggregation::Count,
            show_labels: true,
            bars: vec![
                BarValue { label: "UK".into(), value: 3.0 },
                BarValue { label: "France".into(), value: 2.0 },
            ],
        };
        let other = BarChartSpec {
            aggregation: Aggregation::Sum,
            show_labels: false,
            bars: vec![
                BarValue { label: "Spain".into(), value: 9.0 },
                BarValue { label: "France".into(), value: 5.0 },
                BarValue { label: "UK".into(), value: 1.0 },
            ],
            ..reference.clone()
        };
        let aligned = other.aligned_to(&reference);
        assert_eq!(spec_labels(&aligned), vec!["UK", "France", "Spain"]);
    }

    #[test]
    fn test_value_labels() {
        let mut spec = build_bar_chart(
            &df!("g" => ["x"]).unwrap(),
            "g",
            "",
            Aggregation::Count,
            "",
            true,
        )
        .unwrap();
        assert_eq!(spec.value_label(12.0), "12");
        spec.aggregation = Aggregation::Sum;
        assert_eq!(spec.value_label(1.234), "1.23");
    }
}
