//! Configuration loader
//!
//! Merges configuration from defaults, an optional TOML file, and
//! environment variables, in that order of precedence.

use std::env;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use tracing::info;

use meteo_domain::error::{Error, Result};

use crate::config::AppConfig;
use crate::constants::{CONFIG_ENV_PREFIX, DEFAULT_CONFIG_FILENAME};

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if it exists)
    /// 3. Environment variables with the prefix, nested keys separated by
    ///    a double underscore (e.g. `METEO_LOGGING__LEVEL=debug`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                info!(path = %config_path.display(), "configuration file loaded");
            } else {
                info!(path = %config_path.display(), "configuration file not found, using defaults");
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            info!(path = %default_path.display(), "configuration file loaded");
        }

        figment = figment.merge(Env::prefixed(&format!("{CONFIG_ENV_PREFIX}_")).split("__"));

        let app_config: AppConfig = figment
            .extract()
            .map_err(|e| Error::config_with_source("failed to extract configuration", e))?;

        self.validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Reload configuration (useful after an external edit)
    pub fn reload(&self) -> Result<AppConfig> {
        self.load()
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| Error::config_with_source("failed to serialize config to TOML", e))?;

        std::fs::write(path.as_ref(), toml_string)?;

        Ok(())
    }

    /// Get the configured file path, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let candidate = env::current_dir().ok()?.join(DEFAULT_CONFIG_FILENAME);
        candidate.exists().then_some(candidate)
    }

    fn validate_config(&self, config: &AppConfig) -> Result<()> {
        if config.ingestion.poll_interval_secs == 0 {
            return Err(Error::config("ingestion.poll_interval_secs must be positive"));
        }
        if config.forecast.update_interval_secs == 0 {
            return Err(Error::config("forecast.update_interval_secs must be positive"));
        }
        if config.alerts.check_interval_secs == 0 {
            return Err(Error::config("alerts.check_interval_secs must be positive"));
        }
        if config.forecast.ensemble_size == 0 {
            return Err(Error::config("forecast.ensemble_size must be at least 1"));
        }
        if !config
            .stations
            .locations
            .contains_key(&config.stations.default)
        {
            return Err(Error::config(format!(
                "stations.default '{}' is not in the station catalogue",
                config.stations.default
            )));
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_without_file_yields_defaults() {
        let loader = ConfigLoader::new().with_config_path("/nonexistent/meteo.toml");
        let config = loader.load().unwrap();

        assert_eq!(config.forecast.default_model, "WRF-ARW");
        assert_eq!(config.ingestion.poll_interval_secs, 300);
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [ingestion]
            poll_interval_secs = 30

            [alerts.thresholds]
            wind_speed = 15.0
            "#
        )
        .unwrap();

        let loader = ConfigLoader::new().with_config_path(file.path());
        let config = loader.load().unwrap();

        assert_eq!(config.ingestion.poll_interval_secs, 30);
        assert_eq!(config.alerts.thresholds.wind_speed, 15.0);
        // Untouched sections keep their defaults.
        assert_eq!(config.forecast.ensemble_size, 5);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [forecast]
            ensemble_size = 0
            "#
        )
        .unwrap();

        let loader = ConfigLoader::new().with_config_path(file.path());
        assert!(loader.load().is_err());
    }

    #[test]
    fn config_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meteo.toml");

        let mut config = AppConfig::default();
        config.forecast.default_region = "Vitebsk".to_string();

        let loader = ConfigLoader::new().with_config_path(&path);
        loader.save_to_file(&config, &path).unwrap();

        let loaded = loader.load().unwrap();
        assert_eq!(loaded.forecast.default_region, "Vitebsk");
    }
}
