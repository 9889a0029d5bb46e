//! Control Panel Widget
//! Left side panel with data source, filters and summary metrics.

use crate::data::table::{distinct_values, COUNTRY, VERTICAL};
use crate::data::{Choice, FilterSelection, Totals, YearRange, ALL};
use egui::{Color32, ComboBox, RichText};
use polars::prelude::DataFrame;
use std::path::PathBuf;

/// Filter widgets state. Labels are what the dropdowns show.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterInputs {
    pub country: String,
    pub industry: String,
    pub year_min: i32,
    pub year_max: i32,
}

impl From<FilterSelection> for FilterInputs {
    fn from(selection: FilterSelection) -> Self {
        Self {
            country: selection.country.label().to_string(),
            industry: selection.industry.label().to_string(),
            year_min: selection.years.min,
            year_max: selection.years.max,
        }
    }
}

impl FilterInputs {
    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            country: Choice::from_label(&self.country),
            industry: Choice::from_label(&self.industry),
            years: YearRange::new(self.year_min, self.year_max),
        }
    }

    /// Keep the range ordered after one end moved.
    fn order_years(&mut self, moved_min: bool) {
        if self.year_min > self.year_max {
            if moved_min {
                self.year_max = self.year_min;
            } else {
                self.year_min = self.year_max;
            }
        }
    }
}

/// Left side control panel with file selection and filters.
pub struct ControlPanel {
    pub source: Option<PathBuf>,
    pub countries: Vec<String>,
    pub industries: Vec<String>,
    pub year_bounds: Option<(i32, i32)>,
    pub inputs: Option<FilterInputs>,
    pub totals: Totals,
    pub status: String,
    pub is_loading: bool,
    /// A dataset has been prepared, even if it has no dated rows.
    pub loaded: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            source: None,
            countries: Vec::new(),
            industries: Vec::new(),
            year_bounds: None,
            inputs: None,
            totals: Totals::default(),
            status: "Ready".to_string(),
            is_loading: false,
            loaded: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate dropdowns and metrics from a freshly prepared table.
    pub fn update_options(&mut self, df: &DataFrame, totals: Totals) {
        self.countries = Self::with_all(distinct_values(df, COUNTRY));
        self.industries = Self::with_all(distinct_values(df, VERTICAL));
        self.year_bounds = YearRange::spanning(df).map(|r| (r.min, r.max));
        self.totals = totals;
        self.inputs = self
            .year_bounds
            .map(|(min, max)| FilterSelection::all(YearRange::new(min, max)).into());
        self.loaded = true;
    }

    /// Shown in place of the filters when there is nothing to filter.
    fn filters_placeholder(&self) -> &'static str {
        if self.loaded {
            "No dated rows to filter"
        } else {
            "No data loaded"
        }
    }

    /// Clear everything derived from the previous dataset.
    pub fn reset(&mut self) {
        let source = self.source.take();
        *self = Self {
            source,
            ..Self::default()
        };
    }

    fn with_all(values: Vec<String>) -> Vec<String> {
        std::iter::once(ALL.to_string()).chain(values).collect()
    }

    /// Current filter selection, once a dataset with years is loaded.
    pub fn selection(&self) -> Option<FilterSelection> {
        self.inputs.as_ref().map(FilterInputs::selection)
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🦄 Europe's Unicorns")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.hyperlink_to(
                RichText::new("Source: Pitchbook").size(11.0),
                crate::config::SOURCE_URL,
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let path_text = self
                    .source
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "No file loaded".to_string());
                ui.label(RichText::new(&path_text).size(12.0));

                ui.horizontal(|ui| {
                    ui.add_enabled_ui(!self.is_loading, |ui| {
                        if ui.button("📂 Open").clicked() {
                            action = ControlPanelAction::OpenCsv;
                        }
                        if ui.button("🔄 Reload").clicked() {
                            action = ControlPanelAction::Reload;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 110.0;
        let combo_width = 150.0;

        match (&mut self.inputs, self.year_bounds) {
            (Some(inputs), Some((min_year, max_year))) => {
                let before = inputs.clone();

                ui.horizontal(|ui| {
                    ui.add_sized([label_width, 20.0], egui::Label::new("Select country:"));
                    Self::dropdown(ui, "country", combo_width, &mut inputs.country, &self.countries);
                });
                ui.add_space(5.0);

                ui.horizontal(|ui| {
                    ui.add_sized([label_width, 20.0], egui::Label::new("Select industry:"));
                    Self::dropdown(
                        ui,
                        "industry",
                        combo_width,
                        &mut inputs.industry,
                        &self.industries,
                    );
                });
                ui.add_space(10.0);

                ui.label("Select year:");
                let from = ui.add(
                    egui::Slider::new(&mut inputs.year_min, min_year..=max_year)
                        .text("from")
                        .step_by(1.0),
                );
                let to = ui.add(
                    egui::Slider::new(&mut inputs.year_max, min_year..=max_year)
                        .text("to")
                        .step_by(1.0),
                );
                if from.changed() {
                    inputs.order_years(true);
                } else if to.changed() {
                    inputs.order_years(false);
                }

                if *inputs != before {
                    action = ControlPanelAction::FiltersChanged;
                }
            }
            _ => {
                ui.label(RichText::new(self.filters_placeholder()).color(Color32::GRAY));
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Totals Section =====
        ui.label(RichText::new("📊 Totals").size(14.0).strong());
        ui.add_space(5.0);
        egui::Grid::new("totals_grid")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label("Total Unicorns");
                ui.label(RichText::new(self.totals.unicorns.to_string()).strong());
                ui.end_row();
                ui.label("Total Valuation ($B)");
                ui.label(RichText::new(format!("{:.1}", self.totals.valuation_usd)).strong());
                ui.end_row();
                ui.label("Total Funding ($B)");
                ui.label(RichText::new(format!("{:.1}", self.totals.raised_usd)).strong());
                ui.end_row();
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.inputs.is_some() && !self.is_loading, |ui| {
                let png_button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(png_button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
                ui.add_space(5.0);
                let spec_button = egui::Button::new(RichText::new("📄 Export Specs").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(spec_button).clicked() {
                    action = ControlPanelAction::ExportSpecs;
                }
            });
        });

        ui.add_space(10.0);
        if self.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading...");
            });
        }

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    fn dropdown(ui: &mut egui::Ui, id: &str, width: f32, value: &mut String, options: &[String]) {
        ComboBox::from_id_salt(id)
            .width(width)
            .selected_text(value.as_str())
            .show_ui(ui, |ui| {
                for option in options {
                    ui.selectable_value(value, option.clone(), option.as_str());
                }
            });
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    OpenCsv,
    Reload,
    ClearCache,
    FiltersChanged,
    ExportPng,
    ExportSpecs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::UNICORN_YEAR;
    use polars::prelude::*;

    fn sample() -> DataFrame {
        df!(
            COUNTRY => ["UK", "France", "UK"],
            VERTICAL => ["Fintech", "AI", "AI"],
            UNICORN_YEAR => [Some(2014i32), None, Some(2021)],
        )
        .unwrap()
    }

    #[test]
    fn test_options_start_with_all() {
        let mut panel = ControlPanel::new();
        panel.update_options(&sample(), Totals::default());

        assert_eq!(panel.countries, vec!["All", "France", "UK"]);
        assert_eq!(panel.industries, vec!["All", "AI", "Fintech"]);
        assert_eq!(panel.year_bounds, Some((2014, 2021)));
    }

    #[test]
    fn test_default_selection_is_everything() {
        let mut panel = ControlPanel::new();
        assert!(panel.selection().is_none());

        panel.update_options(&sample(), Totals::default());
        let selection = panel.selection().unwrap();
        assert_eq!(selection, FilterSelection::all(YearRange::new(2014, 2021)));
    }

    #[test]
    fn test_year_range_stays_ordered() {
        let mut inputs = FilterInputs {
            country: ALL.into(),
            industry: ALL.into(),
            year_min: 2020,
            year_max: 2018,
        };
        inputs.order_years(true);
        assert_eq!((inputs.year_min, inputs.year_max), (2020, 2020));

        inputs.year_max = 2016;
        inputs.order_years(false);
        assert_eq!((inputs.year_min, inputs.year_max), (2016, 2016));
    }

    #[test]
    fn test_undated_dataset_has_own_placeholder() {
        let mut panel = ControlPanel::new();
        assert_eq!(panel.filters_placeholder(), "No data loaded");

        let undated = df!(
            COUNTRY => ["UK"],
            VERTICAL => ["Fintech"],
            UNICORN_YEAR => [None::<i32>],
        )
        .unwrap();
        panel.update_options(&undated, Totals::default());
        assert!(panel.inputs.is_none());
        assert_eq!(panel.filters_placeholder(), "No dated rows to filter");

        panel.reset();
        assert_eq!(panel.filters_placeholder(), "No data loaded");
    }

    #[test]
    fn test_reset_keeps_source() {
        let mut panel = ControlPanel::new();
        panel.source = Some(PathBuf::from("data.csv"));
        panel.update_options(&sample(), Totals::default());
        panel.reset();
        assert_eq!(panel.source, Some(PathBuf::from("data.csv")));
        assert!(panel.inputs.is_none());
        assert!(panel.countries.is_empty());
    }
}
