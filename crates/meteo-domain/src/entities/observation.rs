//! Weather station observations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::SensorReading;
use crate::value_objects::MeasurementKind;

/// A full observation reported by a weather station in one transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub id: String,
    pub station_id: String,
    pub observed_at: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: String,
    pub precipitation: f64,
    #[serde(default)]
    pub phenomena: String,
}

impl WeatherObservation {
    /// Fan the observation out into per-channel sensor readings.
    ///
    /// Each reading id is derived from the observation id with a channel
    /// suffix, and all readings share the observation timestamp.
    pub fn to_readings(&self) -> Vec<SensorReading> {
        let measured_at = self.observed_at.timestamp_millis();

        vec![
            SensorReading::new(
                format!("{}_temp", self.id),
                measured_at,
                self.temperature,
                MeasurementKind::Temperature,
            ),
            SensorReading::new(
                format!("{}_hum", self.id),
                measured_at,
                self.humidity,
                MeasurementKind::Humidity,
            ),
            SensorReading::new(
                format!("{}_pres", self.id),
                measured_at,
                self.pressure,
                MeasurementKind::Pressure,
            ),
            SensorReading::new(
                format!("{}_wind", self.id),
                measured_at,
                self.wind_speed,
                MeasurementKind::WindSpeed,
            ),
        ]
    }
}
