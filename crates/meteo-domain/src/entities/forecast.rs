//! Forecasts and their derived digest twin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::TimestampMs;

/// One point of a forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Wall-clock label of the point, `HH:MM`.
    pub time: String,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
}

/// A calculated weather forecast for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub id: String,
    pub model_type: String,
    pub calculation_time: DateTime<Utc>,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub region: String,
    #[serde(default)]
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    /// Derive the digest twin stored alongside the forecast.
    ///
    /// Aggregates the point series into single values: mean temperature,
    /// mean humidity, and a precipitation chance capped at 100. An empty
    /// series digests to zeroes.
    pub fn digest(&self) -> ForecastDigest {
        let (temperature, humidity) = if self.points.is_empty() {
            (0.0, None)
        } else {
            let count = self.points.len() as f64;
            let mean_temp = self.points.iter().map(|p| p.temperature).sum::<f64>() / count;
            let mean_humidity = self.points.iter().map(|p| p.humidity).sum::<f64>() / count;
            (mean_temp, Some(mean_humidity.clamp(0.0, 100.0) as u8))
        };

        ForecastDigest {
            forecast_id: self.id.clone(),
            created_at: self.calculation_time.timestamp_millis(),
            temperature,
            precipitation_chance: humidity.unwrap_or(0).min(100),
            humidity,
            region: self.region.clone(),
        }
    }
}

/// Compact legacy-shape twin of a [`Forecast`].
///
/// Recomputed and stored together with the canonical forecast on every
/// write; freshness queries answer from digests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDigest {
    pub forecast_id: String,
    /// Creation timestamp in millisecond epoch; the freshness window is
    /// evaluated against this value at query time.
    pub created_at: TimestampMs,
    pub temperature: f64,
    /// Chance of precipitation in percent, capped at 100.
    pub precipitation_chance: u8,
    pub humidity: Option<u8>,
    pub region: String,
}
