//! Chart Plotter Module
//! Draws chart specs interactively using egui_plot.

use super::bar::BarChartSpec;
use super::breakdown::YearBreakdownSpec;
use super::composite::{ChartTheme, CompositeChart};
use egui::{Align2, Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoint, Text};

/// Bar fill for single-series charts
pub const BAR_COLOR: Color32 = Color32::from_rgb(76, 120, 168);

/// Color palette for stacked series
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(76, 120, 168),  // Blue
    Color32::from_rgb(245, 133, 24),  // Orange
    Color32::from_rgb(228, 87, 86),   // Red
    Color32::from_rgb(114, 183, 178), // Teal
    Color32::from_rgb(84, 162, 75),   // Green
    Color32::from_rgb(238, 202, 59),  // Yellow
    Color32::from_rgb(178, 121, 162), // Purple
    Color32::from_rgb(255, 157, 166), // Pink
    Color32::from_rgb(157, 117, 93),  // Brown
    Color32::from_rgb(186, 176, 172), // Grey
];

const ROW_HEIGHT: f32 = 22.0;
const MIN_PLOT_HEIGHT: f32 = 60.0;
const BREAKDOWN_HEIGHT: f32 = 400.0;

/// Draws bar chart specs with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the n-th series of a stacked chart.
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Plot y position of the bar at `index`; the first bar sits on top.
    pub fn row_position(index: usize, bar_count: usize) -> f64 {
        (bar_count - 1 - index) as f64
    }

    /// Category label for a y-axis tick, if it lands on a bar.
    pub fn label_at(spec: &BarChartSpec, y: f64) -> Option<&str> {
        let n = spec.bars.len();
        if n == 0 || y < -0.25 || (y - y.round()).abs() > 0.25 {
            return None;
        }
        let row = y.round() as usize;
        if row >= n {
            return None;
        }
        Some(spec.bars[n - 1 - row].label.as_str())
    }

    /// Draw the panels of a composite chart next to each other.
    pub fn draw_composite(ui: &mut egui::Ui, composite: &CompositeChart, id_salt: &str) {
        let theme = composite.theme;
        ui.horizontal_top(|ui| {
            ui.spacing_mut().item_spacing.x = theme.spacing;
            for (i, chart) in composite.charts.iter().enumerate() {
                ui.vertical(|ui| {
                    ui.label(RichText::new(&chart.title).size(14.0).strong());
                    Self::draw_bar_chart(ui, chart, &theme, &format!("{id_salt}_{i}"));
                });
            }
        });
    }

    /// Draw one horizontal bar chart with value labels at the bar ends.
    pub fn draw_bar_chart(ui: &mut egui::Ui, spec: &BarChartSpec, theme: &ChartTheme, id: &str) {
        let label_space = if spec.show_labels {
            theme.label_padding * 2.0
        } else {
            0.0
        };
        let width = theme.panel_width + label_space;

        if spec.is_empty() {
            ui.allocate_ui(egui::vec2(width, MIN_PLOT_HEIGHT), |ui| {
                ui.label(RichText::new("No data").color(Color32::GRAY));
            });
            return;
        }

        let n = spec.bars.len();
        let max = spec.max_value();
        // Leave room right of the longest bar for its label.
        let x_max = if max > 0.0 { max * 1.3 } else { 1.0 };

        let bars: Vec<Bar> = spec
            .bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                Bar::new(Self::row_position(i, n), bar.value)
                    .name(&bar.label)
                    .width(0.8)
                    .fill(BAR_COLOR)
            })
            .collect();

        let axis_spec = spec.clone();

        let frame_stroke = if theme.panel_border {
            ui.visuals().widgets.noninteractive.bg_stroke
        } else {
            egui::Stroke::NONE
        };

        egui::Frame::none().stroke(frame_stroke).show(ui, |ui| {
            Plot::new(id)
                .width(width)
                .height((n as f32 * ROW_HEIGHT).max(MIN_PLOT_HEIGHT))
                .show_axes([false, spec.show_labels])
                .show_grid(false)
                .show_background(theme.panel_border)
                .allow_zoom(false)
                .allow_drag(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .include_x(0.0)
                .include_x(x_max)
                .include_y(-0.5)
                .include_y(n as f64 - 0.5)
                .y_grid_spacer(move |_input| {
                    (0..n)
                        .map(|row| GridMark {
                            value: row as f64,
                            step_size: 1.0,
                        })
                        .collect()
                })
                .y_axis_formatter(move |mark, _range| {
                    Self::label_at(&axis_spec, mark.value)
                        .unwrap_or_default()
                        .to_string()
                })
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new(bars).horizontal().color(BAR_COLOR));

                    for (i, bar) in spec.bars.iter().enumerate() {
                        let position = PlotPoint::new(
                            bar.value + x_max * 0.01,
                            Self::row_position(i, n),
                        );
                        plot_ui.text(
                            Text::new(
                                position,
                                RichText::new(spec.value_label(bar.value)).size(11.0),
                            )
                            .anchor(Align2::LEFT_CENTER),
                        );
                    }
                });
        });
    }

    /// Draw unicorns per year as stacked columns, one layer per series.
    pub fn draw_year_breakdown(ui: &mut egui::Ui, spec: &YearBreakdownSpec, id: &str) {
        ui.label(RichText::new(&spec.title).size(14.0).strong());
        if spec.is_empty() {
            ui.label(RichText::new("No data").color(Color32::GRAY));
            return;
        }

        let mut charts: Vec<BarChart> = Vec::with_capacity(spec.series.len());
        for (i, series) in spec.series.iter().enumerate() {
            let bars: Vec<Bar> = spec
                .years
                .iter()
                .zip(&series.counts)
                .map(|(&year, &count)| {
                    Bar::new(year as f64, count)
                        .name(format!("{}: {count:.0}", series.name))
                        .width(0.7)
                })
                .collect();
            let below: Vec<&BarChart> = charts.iter().collect();
            let chart = BarChart::new(bars)
                .name(&series.name)
                .color(Self::series_color(i))
                .stack_on(&below);
            charts.push(chart);
        }

        Plot::new(id)
            .height(BREAKDOWN_HEIGHT)
            .legend(Legend::default())
            .y_axis_label("Number of Unicorns")
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .include_y(spec.max_stack() * 1.05)
            .x_axis_formatter(|mark, _range| {
                if mark.value.fract() == 0.0 {
                    format!("{:.0}", mark.value)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for chart in charts {
                    plot_ui.bar_chart(chart);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::bar::{Aggregation, BarValue};

    fn spec(labels: &[&str]) -> BarChartSpec {
        BarChartSpec {
            title: "t".into(),
            group_by: "country".into(),
            measure: "company".into(),
            aggregation: Aggregation::Count,
            show_labels: true,
            bars: labels
                .iter()
                .map(|l| BarValue {
                    label: l.to_string(),
                    value: 1.0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_first_bar_on_top() {
        assert_eq!(ChartPlotter::row_position(0, 3), 2.0);
        assert_eq!(ChartPlotter::row_position(2, 3), 0.0);
    }

    #[test]
    fn test_axis_labels_follow_bar_order() {
        let s = spec(&["UK", "France", "Spain"]);
        assert_eq!(ChartPlotter::label_at(&s, 2.0), Some("UK"));
        assert_eq!(ChartPlotter::label_at(&s, 0.0), Some("Spain"));
        assert_eq!(ChartPlotter::label_at(&s, 0.5), None);
        assert_eq!(ChartPlotter::label_at(&s, 3.0), None);
        assert_eq!(ChartPlotter::label_at(&s, -1.0), None);
        assert_eq!(ChartPlotter::label_at(&spec(&[]), 0.0), None);
    }

    #[test]
    fn test_series_colors_cycle() {
        assert_eq!(ChartPlotter::series_color(0), ChartPlotter::series_color(10));
        assert_ne!(ChartPlotter::series_color(0), ChartPlotter::series_color(1));
    }
}
