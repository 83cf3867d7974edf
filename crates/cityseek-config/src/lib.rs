//! CitySeek Configuration Management
//!
//! Provides configuration loading with support for:
//! - Global config: `~/.cityseek/config.toml`
//! - CLI overrides via [`ConfigOverrides`]
//!
//! A missing config file is not an error; every field carries a default.

mod error;
mod loader;

pub use error::ConfigError;
pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default dataset endpoint (the OpenWeather city list gist).
pub const DEFAULT_DATASET_URL: &str = "https://gist.githubusercontent.com/hernan-uala/dce8843a8edbe0b0018b32e137bc2b3a/raw/0996accf70cb0ca0e16f9a99e0ee185fafca7af1/cities.json";

/// Root configuration for CitySeek.
///
/// Represents the fully merged configuration from file and overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SeekerConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Dataset acquisition and query configuration
    pub dataset: DatasetConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Storage locations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory holding the catalog database, the cached dataset
    /// file, and the favorites file. Defaults to `~/.cityseek/data`.
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the effective data directory.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(".cityseek").join("data"))
            .ok_or(ConfigError::NoHomeDir)
    }
}

/// Dataset source and query bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Download endpoint for the raw city dataset (a JSON array)
    pub url: String,

    /// File name of the cached download inside the data dir
    pub cache_file_name: String,

    /// Records per insert batch during ingestion
    pub batch_size: usize,

    /// Result cap applied at the store-query layer
    pub query_limit: usize,

    /// Rows per page in the paging adapter
    pub page_size: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATASET_URL.to_string(),
            cache_file_name: "cities.json".to_string(),
            batch_size: 10_000,
            query_limit: 10_000,
            page_size: 20,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// CLI-provided overrides, applied after the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override the data directory
    pub data_dir: Option<PathBuf>,

    /// Override the dataset download URL
    pub dataset_url: Option<String>,
}

impl SeekerConfig {
    /// Apply CLI overrides on top of this config.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(dir) = &overrides.data_dir {
            self.storage.data_dir = Some(dir.clone());
        }
        if let Some(url) = &overrides.dataset_url {
            self.dataset.url = url.clone();
        }
    }

    /// Validate bounds that would otherwise fail far from their source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset.batch_size == 0 {
            return Err(ConfigError::invalid_value(
                "dataset.batch_size",
                "must be greater than zero",
            ));
        }
        if self.dataset.page_size == 0 {
            return Err(ConfigError::invalid_value(
                "dataset.page_size",
                "must be greater than zero",
            ));
        }
        if self.dataset.url.is_empty() {
            return Err(ConfigError::invalid_value(
                "dataset.url",
                "must not be empty",
            ));
        }
        Ok(())
    }
}
