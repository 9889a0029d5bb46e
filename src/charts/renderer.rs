//! Static Chart Renderer
//! Writes composite bar charts to PNG files with plotters.
//!
//! Layout per panel:
//! 1. Title centered above the plot
//! 2. Category labels on the left (first panel only, when enabled)
//! 3. Horizontal bars, top to bottom, value label at each bar end

use super::bar::BarChartSpec;
use super::composite::{ChartTheme, CompositeChart};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

const BAR_COLOR: RGBColor = RGBColor(76, 120, 168);
const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Nothing to render")]
    Empty,
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(e.to_string())
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every panel of `composite` side by side into a PNG at `path`.
    pub fn render_composite_png(
        composite: &CompositeChart,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        if composite.is_empty() {
            return Err(RenderError::Empty);
        }

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let panels = root.split_evenly((1, composite.charts.len()));
        for (panel, chart) in panels.iter().zip(&composite.charts) {
            Self::draw_panel(panel, chart, &composite.theme)?;
        }

        root.present()?;
        log::info!("Rendered '{}' charts to {}", composite.charts[0].title, path.display());
        Ok(())
    }

    fn draw_panel(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        spec: &BarChartSpec,
        theme: &ChartTheme,
    ) -> Result<(), RenderError> {
        let rows = spec.bars.len().max(1) as i32;
        let max = spec.max_value();
        let x_max = if max > 0.0 { max * 1.3 } else { 1.0 };
        let label_area = if spec.show_labels {
            (theme.label_padding * 2.0) as u32
        } else {
            0
        };

        let mut chart = ChartBuilder::on(area)
            .caption(&spec.title, (FONT, 18).into_font())
            .margin((theme.spacing / 2.0) as u32)
            .x_label_area_size(0)
            .y_label_area_size(label_area)
            .build_cartesian_2d(0f64..x_max, (0..rows).into_segmented())?;

        let label_formatter = |value: &SegmentValue<i32>| match value {
            SegmentValue::CenterOf(row) => Self::label_for_row(spec, *row).to_string(),
            _ => String::new(),
        };

        if spec.show_labels {
            chart
                .configure_mesh()
                .disable_mesh()
                .disable_x_axis()
                .y_labels(rows as usize)
                .y_label_formatter(&label_formatter)
                .y_label_style((FONT, 12).into_font())
                .draw()?;
        } else {
            chart
                .configure_mesh()
                .disable_mesh()
                .disable_x_axis()
                .disable_y_axis()
                .draw()?;
        }

        chart.draw_series(spec.bars.iter().enumerate().map(|(i, bar)| {
            let row = rows - 1 - i as i32;
            let mut rect = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(row)),
                    (bar.value, SegmentValue::Exact(row + 1)),
                ],
                BAR_COLOR.filled(),
            );
            rect.set_margin(3, 3, 0, 0);
            rect
        }))?;

        let value_style =
            TextStyle::from((FONT, 12).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
        chart.draw_series(spec.bars.iter().enumerate().map(|(i, bar)| {
            let row = rows - 1 - i as i32;
            Text::new(
                spec.value_label(bar.value),
                (bar.value + x_max * 0.01, SegmentValue::CenterOf(row)),
                value_style.clone(),
            )
        }))?;

        Ok(())
    }

    /// Category shown at segment `row`; row 0 is the bottom bar.
    fn label_for_row(spec: &BarChartSpec, row: i32) -> &str {
        let n = spec.bars.len() as i32;
        if row < 0 || row >= n {
            return "";
        }
        &spec.bars[(n - 1 - row) as usize].label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::bar::{Aggregation, BarValue};
    use crate::charts::composite::combine_charts;

    #[test]
    fn test_empty_composite_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.png");
        let composite = combine_charts(Vec::<BarChartSpec>::new());
        let err = StaticChartRenderer::render_composite_png(&composite, &out, (200, 100))
            .unwrap_err();
        assert!(matches!(err, RenderError::Empty));
        assert!(!out.exists());
    }

    #[test]
    fn test_composite_without_bars_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("no_bars.png");
        let panel = BarChartSpec {
            title: "Number of Unicorns".into(),
            group_by: "country".into(),
            measure: "company".into(),
            aggregation: Aggregation::Count,
            show_labels: true,
            bars: Vec::new(),
        };
        let composite = combine_charts([panel.clone(), panel]);
        assert!(matches!(
            StaticChartRenderer::render_composite_png(&composite, &out, (200, 100)),
            Err(RenderError::Empty)
        ));
    }

    #[test]
    fn test_row_labels_bottom_up() {
        let spec = BarChartSpec {
            title: String::new(),
            group_by: "country".into(),
            measure: "company".into(),
            aggregation: Aggregation::Count,
            show_labels: true,
            bars: ["UK", "France"]
                .iter()
                .map(|l| BarValue {
                    label: l.to_string(),
                    value: 1.0,
                })
                .collect(),
        };
        assert_eq!(StaticChartRenderer::label_for_row(&spec, 1), "UK");
        assert_eq!(StaticChartRenderer::label_for_row(&spec, 0), "France");
        assert_eq!(StaticChartRenderer::label_for_row(&spec, 2), "");
    }
}
