//! Sensor readings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{MeasurementKind, TimestampMs};

/// A single measurement reported by a sensor.
///
/// The measurement timestamp is a millisecond epoch value; it doubles as the
/// key of the time-bucket index maintained by the reading repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: String,
    pub measured_at: TimestampMs,
    pub value: f64,
    pub kind: MeasurementKind,
}

impl SensorReading {
    pub fn new(
        id: impl Into<String>,
        measured_at: TimestampMs,
        value: f64,
        kind: MeasurementKind,
    ) -> Self {
        Self {
            id: id.into(),
            measured_at,
            value,
            kind,
        }
    }

    /// Measurement timestamp as a UTC datetime, when representable.
    pub fn measured_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.measured_at)
    }
}
