//! Europe's Unicorn Startups - interactive dashboard
//!
//! Loads the Pitchbook unicorn list, keeps European companies and shows
//! count, valuation and funding charts with country, industry and year filters.

mod charts;
mod config;
mod data;
mod gui;

use config::DashboardConfig;
use eframe::egui;
use gui::UnicornApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Europe's Unicorn Startups"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Europe's Unicorn Startups",
        options,
        Box::new(|cc| Ok(Box::new(UnicornApp::new(cc, DashboardConfig::default())))),
    )
}
