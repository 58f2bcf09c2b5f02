//! Model run parameters and alert thresholds

use serde::{Deserialize, Serialize};

/// Parameters of a simulated forecast model run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Model algorithm identifier, e.g. "WRF-ARW".
    pub algorithm: String,
    /// Description of the initial conditions fed to the run.
    pub initial_conditions: String,
    /// Grid resolution label.
    pub grid_resolution: String,
    /// Forecast horizon in hours.
    pub forecast_horizon: u32,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            algorithm: "WRF-ARW (Mesoscale)".to_string(),
            initial_conditions: "Real-time".to_string(),
            grid_resolution: "3 km (high)".to_string(),
            forecast_horizon: 72,
        }
    }
}

/// Thresholds that trigger automatic alert generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Wind speed at or above this value (m/s) raises a squall alert.
    pub wind_speed: f64,
    /// Temperature at or below this value (°C) raises a frost alert.
    pub temperature_low: f64,
    /// Temperature at or above this value (°C) raises a heat alert.
    pub temperature_high: f64,
    /// Hourly precipitation at or above this value (mm/h) raises an alert.
    pub precipitation: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            wind_speed: 20.0,
            temperature_low: -25.0,
            temperature_high: 35.0,
            precipitation: 50.0,
        }
    }
}
