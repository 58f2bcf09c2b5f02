//! Repository port traits
//!
//! Every repository exposes the generic surface (`save`, `get_by_id`,
//! `get_all`) plus the entity-specific queries answered from its secondary
//! index. Point lookups that miss return `Ok(None)`; an absent entity is
//! not an error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    Alert, AlertNotice, Forecast, ForecastDigest, SensorReading, WeatherObservation,
};
use crate::error::Result;
use crate::value_objects::{MeasurementKind, TimestampMs};

/// Repository: sensor readings with a time-bucket index.
#[async_trait]
pub trait SensorReadingRepository: Send + Sync {
    /// Insert or overwrite a reading; the time index is updated in the same
    /// write.
    async fn save(&self, reading: SensorReading) -> Result<()>;

    async fn get_by_id(&self, id: &str) -> Result<Option<SensorReading>>;

    /// All readings, order unspecified.
    async fn get_all(&self) -> Result<Vec<SensorReading>>;

    /// Readings measured in `[start, end]` inclusive, ascending by
    /// measurement timestamp.
    async fn between(&self, start: TimestampMs, end: TimestampMs) -> Result<Vec<SensorReading>>;

    /// All readings of one measurement kind.
    async fn by_kind(&self, kind: MeasurementKind) -> Result<Vec<SensorReading>>;
}

/// Repository: forecasts with a region index and a digest twin.
#[async_trait]
pub trait ForecastRepository: Send + Sync {
    /// Insert or overwrite a forecast; the digest twin and region index are
    /// updated in the same write.
    async fn save(&self, forecast: Forecast) -> Result<()>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Forecast>>;

    async fn get_all(&self) -> Result<Vec<Forecast>>;

    /// Digests for a region whose creation time is within the freshness
    /// window of the query-time clock reading. Entries outside the window
    /// silently drop out of the result without being removed from the
    /// index.
    async fn current_for_region(&self, region: &str) -> Result<Vec<ForecastDigest>>;

    /// Every forecast indexed under a region, regardless of freshness.
    async fn all_for_region(&self, region: &str) -> Result<Vec<Forecast>>;

    /// The forecast with the latest calculation time for a region.
    async fn latest_for_region(&self, region: &str) -> Result<Option<Forecast>>;
}

/// Repository: alerts with a derived notice twin.
///
/// The two activity queries are intentionally independent: notices answer
/// from the validity window alone, alerts from the `is_active` flag plus
/// the window.
#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Insert or overwrite an alert; the notice twin is recomputed in the
    /// same write.
    async fn save(&self, alert: Alert) -> Result<()>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Alert>>;

    async fn get_all(&self) -> Result<Vec<Alert>>;

    /// Notices whose validity window contains `now`.
    async fn active_notices(&self, now: TimestampMs) -> Result<Vec<AlertNotice>>;

    /// Alerts flagged active whose validity window contains `now`.
    async fn active_alerts(&self, now: DateTime<Utc>) -> Result<Vec<Alert>>;
}

/// Repository: station observations with a per-station index.
#[async_trait]
pub trait ObservationRepository: Send + Sync {
    async fn save(&self, observation: WeatherObservation) -> Result<()>;

    async fn get_by_id(&self, id: &str) -> Result<Option<WeatherObservation>>;

    async fn get_all(&self) -> Result<Vec<WeatherObservation>>;

    /// The most recent observation for a station.
    async fn latest_for_station(&self, station_id: &str) -> Result<Option<WeatherObservation>>;

    /// Observations for a station within the last `hours` hours, evaluated
    /// against the repository clock at query time.
    async fn station_history(&self, station_id: &str, hours: i64)
    -> Result<Vec<WeatherObservation>>;
}
