//! Chart Composition
//! Side-by-side layout of bar charts and the full chart set of the dashboard.

use super::bar::{build_bar_chart, Aggregation, BarChartSpec, ChartError};
use super::breakdown::{build_year_breakdown, YearBreakdownSpec};
use crate::data::table::{COMPANY, COUNTRY, RAISED_USD, VALUATION_USD, VERTICAL};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Visual settings shared by every panel of a composite chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartTheme {
    /// Horizontal gap between panels.
    pub spacing: f32,
    /// Width of one panel's plot area.
    pub panel_width: f32,
    /// Space reserved for the left-aligned category labels.
    pub label_padding: f32,
    /// Draw a frame around each panel.
    pub panel_border: bool,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            spacing: 10.0,
            panel_width: 250.0,
            label_padding: 70.0,
            panel_border: false,
        }
    }
}

/// Bar charts laid out horizontally, each keeping its own title and order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeChart {
    pub charts: Vec<BarChartSpec>,
    pub theme: ChartTheme,
}

impl CompositeChart {
    /// True when no panel has a bar to draw.
    pub fn is_empty(&self) -> bool {
        self.charts.iter().all(BarChartSpec::is_empty)
    }

    pub fn with_theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }
}

/// Lay charts out side by side with the default theme.
pub fn combine_charts(charts: impl IntoIterator<Item = BarChartSpec>) -> CompositeChart {
    CompositeChart {
        charts: charts.into_iter().collect(),
        theme: ChartTheme::default(),
    }
}

pub const COUNT_TITLE: &str = "Number of Unicorns";
pub const VALUATION_TITLE: &str = "Valuation ($B)";
pub const FUNDING_TITLE: &str = "Total Funding ($B)";

/// Every chart the dashboard shows for one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    pub by_country: CompositeChart,
    pub by_vertical: CompositeChart,
    pub country_years: YearBreakdownSpec,
    pub vertical_years: YearBreakdownSpec,
}

impl DashboardCharts {
    pub fn build(df: &DataFrame, theme: ChartTheme) -> Result<Self, ChartError> {
        Ok(Self {
            by_country: Self::measure_row(df, COUNTRY, theme)?,
            by_vertical: Self::measure_row(df, VERTICAL, theme)?,
            country_years: build_year_breakdown(df, COUNTRY, COUNT_TITLE)?,
            vertical_years: build_year_breakdown(df, VERTICAL, COUNT_TITLE)?,
        })
    }

    /// Count, valuation and funding per group.
    ///
    /// Only the count panel shows category labels, so the other two follow
    /// its category order to stay row-aligned with it.
    fn measure_row(
        df: &DataFrame,
        group_by: &str,
        theme: ChartTheme,
    ) -> Result<CompositeChart, ChartError> {
        let count = build_bar_chart(df, group_by, COMPANY, Aggregation::Count, COUNT_TITLE, true)?;
        let valuation = build_bar_chart(
            df,
            group_by,
            VALUATION_USD,
            Aggregation::Sum,
            VALUATION_TITLE,
            false,
        )?
        .aligned_to(&count);
        let funding = build_bar_chart(
            df,
            group_by,
            RAISED_USD,
            Aggregation::Sum,
            FUNDING_TITLE,
            false,
        )?
        .aligned_to(&count);

        Ok(combine_charts([count, valuation, funding]).with_theme(theme))
    }
}
