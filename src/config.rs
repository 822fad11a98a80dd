use serde::Deserialize;
use std::path::Path;

use crate::signals::DEFAULT_REGION;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub catalog: CatalogConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Region applied to detections that do not carry one.
    pub default_region: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// Operator-tuned catalog file. `None` uses the built-in table.
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Log a progress line every N records; 0 disables.
    pub stats_interval: u64,
    /// Pretty-print single-shot JSON output.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            catalog: CatalogConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_region: DEFAULT_REGION.into(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stats_interval: 1000,
            pretty: false,
        }
    }
}

impl Config {
    /// Read `rfguess.toml` (or the `--config` path). A missing, unreadable or
    /// malformed file yields the built-in defaults: UK/EU region, embedded
    /// catalog.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config at {}, using built-in defaults", path.display());
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Config loaded from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
