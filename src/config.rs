//! Dashboard configuration

use crate::charts::ChartTheme;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dataset read at startup.
pub const DATA_FILE: &str = "unicorns-pitchbook.csv";

pub const SOURCE_URL: &str = "https://pitchbook.com/news/articles/unicorn-startups-list-trends";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub data_file: PathBuf,
    pub theme: ChartTheme,
    /// Pixel size of exported composite PNGs.
    pub export_size: (u32, u32),
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DATA_FILE),
            theme: ChartTheme::default(),
            export_size: (1400, 600),
        }
    }
}
