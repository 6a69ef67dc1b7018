//! Job configuration loaded from TOML.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_LONG_COL: &str = "longitude";
pub const DEFAULT_LAT_COL: &str = "latitude";

/// Conversion job settings.
///
/// ```toml
/// input = "usa.csv"
/// output = "usa.geojson"
/// dump_csv = "usa_admin.csv"
/// long_col = "lon"
/// bounds = ["ADM1.geojson", "ADM2.geojson"]
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub dump_csv: Option<PathBuf>,
    #[serde(default = "default_long_col")]
    pub long_col: String,
    #[serde(default = "default_lat_col")]
    pub lat_col: String,
    /// One boundary file per administrative level, in level order
    #[serde(default)]
    pub bounds: Vec<PathBuf>,
    #[serde(default)]
    pub parallel: bool,
}

fn default_long_col() -> String {
    DEFAULT_LONG_COL.to_string()
}

fn default_lat_col() -> String {
    DEFAULT_LAT_COL.to_string()
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            dump_csv: None,
            long_col: default_long_col(),
            lat_col: default_lat_col(),
            bounds: Vec::new(),
            parallel: false,
        }
    }
}

impl JobConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: JobConfig = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
