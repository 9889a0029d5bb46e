//! Unicorn Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{DashboardCharts, StaticChartRenderer};
use crate::config::DashboardConfig;
use crate::data::{apply_filters, records, DatasetCache, FilterSelection, Totals};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use anyhow::Context;
use egui::SidePanel;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

/// Dataset loading result from background thread
enum LoadResult {
    Complete { path: PathBuf, df: Arc<DataFrame> },
    Error(String),
}

/// Main application window.
pub struct UnicornApp {
    config: DashboardConfig,
    cache: Arc<DatasetCache>,
    dataset: Option<Arc<DataFrame>>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl UnicornApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let data_file = config.data_file.clone();
        let mut app = Self {
            config,
            cache: Arc::new(DatasetCache::new()),
            dataset: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        app.start_loading(data_file);
        app
    }

    /// Prepare (or fetch from cache) the dataset at `path` on a background thread.
    fn start_loading(&mut self, path: PathBuf) {
        if self.is_loading {
            return;
        }

        self.control_panel.source = Some(path.clone());
        self.control_panel.set_status("Loading CSV file...");
        self.is_loading = true;
        self.control_panel.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let cache = Arc::clone(&self.cache);

        thread::spawn(move || {
            let result = match cache.get_or_prepare(&path) {
                Ok(df) => LoadResult::Complete { path, df },
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for dataset loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete { path, df }) => {
                self.finish_loading();
                self.set_dataset(df);
                log::info!("Dashboard showing {}", path.display());
            }
            Ok(LoadResult::Error(error)) => {
                self.finish_loading();
                log::error!("Failed to load dataset: {error}");
                self.dataset = None;
                self.control_panel.reset();
                self.chart_viewer.clear();
                self.control_panel.set_status(&format!("Error: {error}"));
            }
            // Still loading
            Err(_) => self.load_rx = Some(rx),
        }
    }

    fn finish_loading(&mut self) {
        self.is_loading = false;
        self.control_panel.is_loading = false;
    }

    fn set_dataset(&mut self, df: Arc<DataFrame>) {
        let totals = match Totals::of(&df) {
            Ok(totals) => totals,
            Err(e) => {
                log::error!("Failed to compute totals: {e}");
                Totals::default()
            }
        };
        self.control_panel.update_options(&df, totals);
        self.control_panel
            .set_status(&format!("Loaded {} unicorns", df.height()));
        self.dataset = Some(df);
        self.refresh_view();
    }

    /// Recompute the filtered view and every chart from the current filters.
    fn refresh_view(&mut self) {
        let (Some(df), Some(selection)) = (&self.dataset, self.control_panel.selection()) else {
            self.chart_viewer.clear();
            return;
        };

        match Self::build_view(df, &selection, &self.config) {
            Ok((charts, rows)) => self.chart_viewer.set_view(charts, rows),
            Err(e) => {
                log::error!("Failed to build view: {e:#}");
                self.chart_viewer.clear();
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }

    fn build_view(
        df: &DataFrame,
        selection: &FilterSelection,
        config: &DashboardConfig,
    ) -> anyhow::Result<(DashboardCharts, Vec<crate::data::PreparedRecord>)> {
        let filtered = apply_filters(df, selection).context("applying filters")?;
        let charts = DashboardCharts::build(&filtered, config.theme).context("building charts")?;
        let rows = records(&filtered).context("reading records")?;
        Ok((charts, rows))
    }

    fn menu_bar(&self, ui: &mut egui::Ui) -> Option<ControlPanelAction> {
        let mut action = None;
        let has_charts = self.chart_viewer.charts.is_some();
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                ui.add_enabled_ui(!self.is_loading, |ui| {
                    if ui.button("Open CSV...").clicked() {
                        action = Some(ControlPanelAction::OpenCsv);
                    }
                    if ui.button("Reload").clicked() {
                        action = Some(ControlPanelAction::Reload);
                    }
                    if ui.button("Clear cache and reload").clicked() {
                        action = Some(ControlPanelAction::ClearCache);
                    }
                });
                ui.separator();
                ui.add_enabled_ui(has_charts, |ui| {
                    if ui.button("Export charts as PNG...").clicked() {
                        action = Some(ControlPanelAction::ExportPng);
                    }
                    if ui.button("Export chart specs...").clicked() {
                        action = Some(ControlPanelAction::ExportSpecs);
                    }
                });
                if action.is_some() {
                    ui.close_menu();
                }
            });
        });
        action
    }

    fn handle_action(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::OpenCsv => self.handle_open_csv(),
            ControlPanelAction::Reload => self.handle_reload(),
            ControlPanelAction::ClearCache => self.handle_clear_cache(),
            ControlPanelAction::FiltersChanged => self.refresh_view(),
            ControlPanelAction::ExportPng => self.handle_export_png(),
            ControlPanelAction::ExportSpecs => self.handle_export_specs(),
            ControlPanelAction::None => {}
        }
    }

    /// Handle CSV file selection
    fn handle_open_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.chart_viewer.clear();
            self.start_loading(path);
        }
    }

    /// Drop the cached dataset and read the file again.
    fn handle_reload(&mut self) {
        let Some(path) = self.control_panel.source.clone() else {
            return;
        };
        self.cache.invalidate(&path);
        self.start_loading(path);
    }

    /// Forget every prepared dataset, then reload the current source.
    fn handle_clear_cache(&mut self) {
        if !self.cache.is_empty() {
            log::info!("Clearing {} cached datasets", self.cache.len());
            self.cache.clear();
        }
        if let Some(path) = self.control_panel.source.clone() {
            self.start_loading(path);
        }
    }

    /// Handle PNG export - one image per composite chart row
    fn handle_export_png(&mut self) {
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };
        match self.export_png(&dir) {
            Ok(count) => self
                .control_panel
                .set_status(&format!("Exported {count} charts to {}", dir.display())),
            Err(e) => {
                log::error!("PNG export failed: {e:#}");
                self.control_panel.set_status(&format!("Error: {e:#}"));
            }
        }
    }

    fn export_png(&self, dir: &Path) -> anyhow::Result<usize> {
        let charts = self.chart_viewer.charts.as_ref().context("no charts to export")?;
        let outputs: Vec<_> = [
            (&charts.by_country, "unicorns_by_country.png"),
            (&charts.by_vertical, "unicorns_by_vertical.png"),
        ]
        .into_iter()
        .filter(|(composite, _)| !composite.is_empty())
        .collect();
        anyhow::ensure!(!outputs.is_empty(), "the current filters match no unicorns");
        for (composite, name) in &outputs {
            let path = dir.join(name);
            StaticChartRenderer::render_composite_png(composite, &path, self.config.export_size)
                .with_context(|| format!("rendering {}", path.display()))?;
        }
        Ok(outputs.len())
    }

    /// Handle chart spec export as JSON
    fn handle_export_specs(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("unicorn_charts.json")
            .save_file()
        else {
            return;
        };
        match self.export_specs(&path) {
            Ok(()) => self
                .control_panel
                .set_status(&format!("Chart specs saved to {}", path.display())),
            Err(e) => {
                log::error!("Spec export failed: {e:#}");
                self.control_panel.set_status(&format!("Error: {e:#}"));
            }
        }
    }

    fn export_specs(&self, path: &Path) -> anyhow::Result<()> {
        let charts = self.chart_viewer.charts.as_ref().context("no charts to export")?;
        let json = serde_json::to_string_pretty(charts).context("serializing chart specs")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

impl eframe::App for UnicornApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            if let Some(action) = self.menu_bar(ui) {
                self.handle_action(action);
            }
        });

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);
                    self.handle_action(action);
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
