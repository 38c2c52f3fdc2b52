//! Analysis Configuration
//! Input/output locations and chart style, optionally read from a JSON file.

use crate::charts::{parse_hex_color, ChartStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// File looked up in the working directory by the binaries.
pub const CONFIG_FILE: &str = "eda.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid palette colour '{0}'")]
    InvalidColor(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub netflix_csv: PathBuf,
    pub cleaned_netflix_csv: PathBuf,
    pub population_csv: PathBuf,
    pub chart_dir: PathBuf,
    /// Open every rendered chart with the system viewer.
    pub open_charts: bool,
    /// Director value standing in for "unknown" in the catalog.
    pub director_placeholder: String,
    pub style: ChartStyle,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            netflix_csv: PathBuf::from("netflix1.csv"),
            cleaned_netflix_csv: PathBuf::from("cleaned_netflix_data.csv"),
            population_csv: PathBuf::from("world_population.csv"),
            chart_dir: PathBuf::from("charts"),
            open_charts: false,
            director_placeholder: "Not Given".to_string(),
            style: ChartStyle::default(),
        }
    }
}

impl AnalysisConfig {
    /// Read and validate a JSON config file. Absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// [`load`](Self::load) when `path` exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self
            .style
            .palette
            .iter()
            .find(|c| parse_hex_color(c).is_none())
        {
            Some(bad) => Err(ConfigError::InvalidColor(bad.clone())),
            None => Ok(()),
        }
    }
}
