//! Charts module - Chart specs and rendering

mod bar;
mod breakdown;
mod composite;
mod plotter;
mod renderer;

pub use composite::{ChartTheme, DashboardCharts};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
