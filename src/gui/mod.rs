//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod records_table;

pub use app::UnicornApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
