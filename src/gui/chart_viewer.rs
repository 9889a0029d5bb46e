//! Chart Viewer Widget
//! Central scrollable area with the composite bar charts, per-year
//! breakdowns and the filtered records table.

use super::records_table::{draw_records_table, record_cells};
use crate::charts::{ChartPlotter, DashboardCharts};
use crate::data::PreparedRecord;
use egui::{RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;

/// Everything derived from the current filtered view.
#[derive(Default)]
pub struct ChartViewer {
    pub charts: Option<DashboardCharts>,
    pub records: Vec<PreparedRecord>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.charts = None;
        self.records.clear();
    }

    pub fn set_view(&mut self, charts: DashboardCharts, records: Vec<PreparedRecord>) {
        let flagged = records
            .iter()
            .filter(|r| record_cells(r).iter().any(|c| c.out_of_range))
            .count();
        if flagged > 0 {
            log::warn!("{flagged} of {} rows have values outside the display range", records.len());
        }
        self.charts = Some(charts);
        self.records = records;
    }

    /// Draw the chart viewer
    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(charts) = &self.charts else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Europe's Unicorn Startups");
                ui.add_space(SECTION_SPACING);

                ChartPlotter::draw_composite(ui, &charts.by_country, "by_country");
                ui.add_space(SECTION_SPACING);
                ChartPlotter::draw_composite(ui, &charts.by_vertical, "by_vertical");
                ui.add_space(SECTION_SPACING);

                ChartPlotter::draw_year_breakdown(ui, &charts.country_years, "country_years");
                ui.add_space(SECTION_SPACING);
                ChartPlotter::draw_year_breakdown(ui, &charts.vertical_years, "vertical_years");
                ui.add_space(SECTION_SPACING);

                draw_records_table(ui, &self.records);
            });
    }
}
