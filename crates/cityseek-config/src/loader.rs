//! Configuration loader.
//!
//! Loads `config.toml` from the global config directory and applies CLI
//! overrides on top. A missing file yields the defaults; a present but
//! unreadable or malformed file is an error.

use crate::error::ConfigError;
use crate::{ConfigOverrides, SeekerConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Global configuration directory name under the home dir.
const GLOBAL_CONFIG_DIR: &str = ".cityseek";

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Global config directory (e.g., `~/.cityseek`)
    global_config_dir: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    ///
    /// Automatically detects the global config directory (`~/.cityseek`).
    pub fn new() -> Self {
        let global_config_dir = dirs::home_dir().map(|h| h.join(GLOBAL_CONFIG_DIR));
        Self { global_config_dir }
    }

    /// Create a loader with a custom global config directory.
    ///
    /// Useful for testing.
    pub fn with_global_dir(global_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_config_dir: Some(global_dir.into()),
        }
    }

    /// Load the effective configuration: file (if present) plus overrides.
    pub fn load(&self, overrides: &ConfigOverrides) -> Result<SeekerConfig, ConfigError> {
        let mut config = match self.config_file_path() {
            Some(path) if path.is_file() => Self::load_file(&path)?,
            Some(path) => {
                debug!(path = %path.display(), "no config file, using defaults");
                SeekerConfig::default()
            }
            None => SeekerConfig::default(),
        };

        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Path of the global config file, if a global dir is known.
    pub fn config_file_path(&self) -> Option<PathBuf> {
        self.global_config_dir
            .as_ref()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    fn load_file(path: &Path) -> Result<SeekerConfig, ConfigError> {
        debug!(path = %path.display(), "loading config file");
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        toml::from_str(&content).map_err(|e| ConfigError::parse_toml(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let loader = ConfigLoader::with_global_dir(dir.path());
        let config = loader.load(&ConfigOverrides::default()).expect("load");
        assert_eq!(config.dataset.batch_size, 10_000);
    }

    #[test]
    fn test_file_values_are_loaded() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
            [dataset]
            url = "https://example.com/cities.json"
            batch_size = 500

            [logging]
            level = "debug"
            "#,
        )
        .expect("write config");

        let loader = ConfigLoader::with_global_dir(dir.path());
        let config = loader.load(&ConfigOverrides::default()).expect("load");
        assert_eq!(config.dataset.url, "https://example.com/cities.json");
        assert_eq!(config.dataset.batch_size, 500);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_overrides_beat_file_values() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
            [dataset]
            url = "https://example.com/from-file.json"
            "#,
        )
        .expect("write config");

        let loader = ConfigLoader::with_global_dir(dir.path());
        let overrides = ConfigOverrides {
            dataset_url: Some("https://example.com/from-cli.json".to_string()),
            ..Default::default()
        };
        let config = loader.load(&overrides).expect("load");
        assert_eq!(config.dataset.url, "https://example.com/from-cli.json");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "not = [valid").expect("write");

        let loader = ConfigLoader::with_global_dir(dir.path());
        assert!(matches!(
            loader.load(&ConfigOverrides::default()),
            Err(ConfigError::ParseToml { .. })
        ));
    }
}
