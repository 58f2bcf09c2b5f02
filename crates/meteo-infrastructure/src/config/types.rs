//! Configuration types
//!
//! Typed serde structs for every configuration section. Defaults reproduce
//! the values the platform ships with, so a missing or partial config file
//! always yields a runnable setup.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use meteo_domain::value_objects::AlertThresholds;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ingestion: IngestionConfig,
    pub forecast: ForecastConfig,
    pub stations: StationsConfig,
    pub alerts: AlertsConfig,
    pub logging: LoggingConfig,
}

/// Data ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Seconds between source polls.
    pub poll_interval_secs: u64,
    /// Source identifiers polled each cycle.
    pub sources: Vec<String>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 300,
            sources: vec![
                "station_26850".to_string(),
                "station_26851".to_string(),
                "radar_minsk".to_string(),
            ],
        }
    }
}

/// Forecast calculation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Seconds between scheduled forecast updates.
    pub update_interval_secs: u64,
    pub default_model: String,
    pub available_models: Vec<String>,
    pub ensemble_size: usize,
    pub default_region: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: 3_600,
            default_model: "WRF-ARW".to_string(),
            available_models: vec![
                "WRF-ARW".to_string(),
                "GFS".to_string(),
                "ICON-EU".to_string(),
                "ECMWF".to_string(),
            ],
            ensemble_size: 5,
            default_region: "Minsk".to_string(),
        }
    }
}

/// One configured station location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub kind: String,
}

/// Station catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StationsConfig {
    /// Station used by the scheduled alert checks.
    pub default: String,
    pub locations: HashMap<String, StationLocation>,
}

impl Default for StationsConfig {
    fn default() -> Self {
        let mut locations = HashMap::new();
        locations.insert(
            "26850".to_string(),
            StationLocation {
                name: "Minsk-Uruchcha".to_string(),
                lat: 53.94,
                lon: 27.69,
                kind: "meteo".to_string(),
            },
        );
        Self {
            default: "26850".to_string(),
            locations,
        }
    }
}

/// Alert evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Seconds between scheduled alert checks.
    pub check_interval_secs: u64,
    pub thresholds: AlertThresholds,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 60,
            thresholds: AlertThresholds::default(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log filter, e.g. "info" or "meteo=debug".
    pub level: String,
    /// Emit JSON-structured lines instead of human-readable ones.
    pub json_format: bool,
    /// Optional path for daily-rolling file output.
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_runnable_setup() {
        let config = AppConfig::default();

        assert_eq!(config.ingestion.sources.len(), 3);
        assert_eq!(config.forecast.default_region, "Minsk");
        assert!(config.stations.locations.contains_key(&config.stations.default));
        assert_eq!(config.alerts.thresholds.wind_speed, 20.0);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let config: AppConfig = toml::from_str(
            r#"
            [forecast]
            default_region = "Brest"
            "#,
        )
        .unwrap();

        assert_eq!(config.forecast.default_region, "Brest");
        assert_eq!(config.forecast.ensemble_size, 5);
        assert_eq!(config.ingestion.poll_interval_secs, 300);
    }
}
