//! Secondary index maintainers
//!
//! One maintainer per entity kind. All of them follow the same repair
//! policy: when an indexed attribute changed between writes, the previous
//! bucket entry is removed inside the same `apply` call, so an identifier
//! is never indexed under both its old and its new key.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use meteo_domain::entities::{
    Alert, AlertNotice, Forecast, ForecastDigest, SensorReading, WeatherObservation,
};
use meteo_domain::value_objects::TimestampMs;

use crate::store::SecondaryIndex;

/// Time-bucket index over sensor readings.
///
/// Bucket key is the exact measurement timestamp; a bucket holds the ids of
/// every reading measured at that instant. The ordered map is what makes
/// the inclusive range scan of `between` a single `range` call.
#[derive(Debug, Default)]
pub struct TimeBucketIndex {
    buckets: BTreeMap<TimestampMs, BTreeSet<String>>,
}

impl TimeBucketIndex {
    /// Ids of readings measured in `[start, end]` inclusive, in timestamp
    /// order.
    pub fn ids_between(&self, start: TimestampMs, end: TimestampMs) -> Vec<&str> {
        if start > end {
            return Vec::new();
        }
        self.buckets
            .range(start..=end)
            .flat_map(|(_, ids)| ids.iter().map(String::as_str))
            .collect()
    }

    fn remove_entry(&mut self, at: TimestampMs, id: &str) {
        let drop_bucket = match self.buckets.get_mut(&at) {
            Some(bucket) => {
                bucket.remove(id);
                bucket.is_empty()
            }
            None => false,
        };
        if drop_bucket {
            self.buckets.remove(&at);
        }
    }
}

impl SecondaryIndex<SensorReading> for TimeBucketIndex {
    fn apply(&mut self, previous: Option<&SensorReading>, entity: &SensorReading) {
        if let Some(prev) = previous {
            if prev.measured_at != entity.measured_at {
                self.remove_entry(prev.measured_at, &prev.id);
            }
        }
        self.buckets
            .entry(entity.measured_at)
            .or_default()
            .insert(entity.id.clone());
    }
}

/// Region index plus digest twin store for forecasts.
///
/// Region buckets are ordered, append-once lists of forecast ids. The
/// digest is recomputed on every write, in the same `apply` call that
/// maintains the region bucket, so the canonical forecast and its twin are
/// updated together.
#[derive(Debug, Default)]
pub struct ForecastIndex {
    regions: HashMap<String, Vec<String>>,
    digests: HashMap<String, ForecastDigest>,
}

impl ForecastIndex {
    /// Forecast ids indexed under a region, in insertion order.
    pub fn region_ids(&self, region: &str) -> &[String] {
        self.regions.get(region).map_or(&[], Vec::as_slice)
    }

    pub fn digest(&self, forecast_id: &str) -> Option<&ForecastDigest> {
        self.digests.get(forecast_id)
    }
}

impl SecondaryIndex<Forecast> for ForecastIndex {
    fn apply(&mut self, previous: Option<&Forecast>, entity: &Forecast) {
        if let Some(prev) = previous {
            if prev.region != entity.region {
                if let Some(bucket) = self.regions.get_mut(&prev.region) {
                    bucket.retain(|id| id != &prev.id);
                }
            }
        }

        let bucket = self.regions.entry(entity.region.clone()).or_default();
        if !bucket.iter().any(|id| id == &entity.id) {
            bucket.push(entity.id.clone());
        }

        self.digests.insert(entity.id.clone(), entity.digest());
    }
}

/// Notice twin store for alerts.
///
/// Every alert write produces a derived notice stored under the alert's
/// identifier. Activity is evaluated against the notice validity window at
/// query time; the canonical alert's `is_active` flag is a separate signal
/// that lives on the primary store.
#[derive(Debug, Default)]
pub struct NoticeIndex {
    notices: HashMap<String, AlertNotice>,
}

impl NoticeIndex {
    /// Notices whose validity window contains `now`.
    pub fn active(&self, now: TimestampMs) -> Vec<AlertNotice> {
        self.notices
            .values()
            .filter(|notice| notice.is_current(now))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&AlertNotice> {
        self.notices.get(id)
    }
}

impl SecondaryIndex<Alert> for NoticeIndex {
    fn apply(&mut self, _previous: Option<&Alert>, entity: &Alert) {
        self.notices.insert(entity.id.clone(), entity.notice());
    }
}

/// Per-station index over weather observations.
#[derive(Debug, Default)]
pub struct StationIndex {
    stations: HashMap<String, Vec<String>>,
}

impl StationIndex {
    /// Observation ids for a station, in insertion order.
    pub fn station_ids(&self, station_id: &str) -> &[String] {
        self.stations.get(station_id).map_or(&[], Vec::as_slice)
    }
}

impl SecondaryIndex<WeatherObservation> for StationIndex {
    fn apply(&mut self, previous: Option<&WeatherObservation>, entity: &WeatherObservation) {
        if let Some(prev) = previous {
            if prev.station_id != entity.station_id {
                if let Some(bucket) = self.stations.get_mut(&prev.station_id) {
                    bucket.retain(|id| id != &prev.id);
                }
            }
        }

        let bucket = self.stations.entry(entity.station_id.clone()).or_default();
        if !bucket.iter().any(|id| id == &entity.id) {
            bucket.push(entity.id.clone());
        }
    }
}
