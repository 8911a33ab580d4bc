//! Configuration: defaults, then an optional TOML file, then `INSIGHT__*`
//! environment variables (e.g. `INSIGHT__DISPLAY__TOP_N=10`).

use crate::error::ConfigError;
use crate::features::RiskThresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "INSIGHT";

/// Locations of the four source tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcePaths {
    pub forecasts: PathBuf,
    pub sales: PathBuf,
    pub stores: PathBuf,
    pub inventory: PathBuf,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            forecasts: PathBuf::from("forecasts/forecast_results_sample.csv"),
            sales: PathBuf::from("data/train_sample.csv"),
            stores: PathBuf::from("data/stores.csv"),
            inventory: PathBuf::from("data/processed/inventory_prepared_sample.csv"),
        }
    }
}

/// Presentation settings for the dashboard shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Number of families shown in the promotion-lift ranking
    pub top_n: usize,
    /// Number of risk cells listed as hotspots
    pub hotspots: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_n: 15,
            hotspots: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub sources: SourcePaths,
    pub thresholds: RiskThresholds,
    pub display: DisplayConfig,
}

impl InsightConfig {
    /// Build the configuration; a given file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }
        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: InsightConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply a command-line `top_n` override and re-validate
    pub fn with_top_n(mut self, top_n: Option<usize>) -> Result<Self, ConfigError> {
        if let Some(top_n) = top_n {
            self.display.top_n = top_n;
            self.validate()?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "display.top_n must be greater than zero".to_string(),
            ));
        }
        let ratio = self.thresholds.overstock_ratio;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "thresholds.overstock_ratio must be a positive number, got {}",
                ratio
            )));
        }
        if !self.thresholds.stockout_min_predicted.is_finite() {
            return Err(ConfigError::ValidationError(
                "thresholds.stockout_min_predicted must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
