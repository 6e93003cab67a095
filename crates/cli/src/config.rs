//! Optional TOML configuration file.
//!
//! Every field has a default, so an empty or missing file is valid.
//! Command-line flags override whatever the file says.
//!
//! ```toml
//! data_dir = "data"
//! notes_file = "notes.json"
//!
//! [filters.floors]
//! reviews = 20
//!
//! [aggregation]
//! top_n = 10
//! min_group_size = 10
//! heatmap_top_per_metric = 5
//! ```

use anyhow::{Context, Result};
use pipeline::{DEFAULT_TOP_N, DEFAULT_TOP_PER_METRIC, FilterDefaults};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "game-insights.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// Defaults to `notes.json` inside the data directory
    pub notes_file: Option<PathBuf>,
    pub filters: FiltersConfig,
    pub aggregation: AggregationConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    /// Columns filtered from the start, with their minimum
    pub floors: FilterDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub top_n: usize,
    pub min_group_size: usize,
    pub heatmap_top_per_metric: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            notes_file: None,
            filters: FiltersConfig::default(),
            aggregation: AggregationConfig::default(),
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            min_group_size: 10,
            heatmap_top_per_metric: DEFAULT_TOP_PER_METRIC,
        }
    }
}

impl AppConfig {
    /// Read the config.
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// used when present and the built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn notes_path(&self) -> PathBuf {
        self.notes_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(dashboard::NOTES_FILE))
    }
}
