//! Sensor reading repository

use async_trait::async_trait;

use meteo_domain::entities::SensorReading;
use meteo_domain::error::Result;
use meteo_domain::ports::SensorReadingRepository;
use meteo_domain::value_objects::{MeasurementKind, TimestampMs};

use crate::index::TimeBucketIndex;
use crate::store::IndexedStore;

/// In-memory sensor reading store with a time-bucket index.
pub struct InMemorySensorReadingRepository {
    store: IndexedStore<SensorReading, TimeBucketIndex>,
}

impl InMemorySensorReadingRepository {
    pub fn new() -> Self {
        Self {
            store: IndexedStore::default(),
        }
    }
}

impl Default for InMemorySensorReadingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SensorReadingRepository for InMemorySensorReadingRepository {
    async fn save(&self, reading: SensorReading) -> Result<()> {
        self.store.upsert(reading).await;
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<SensorReading>> {
        Ok(self.store.get_by_id(id).await)
    }

    async fn get_all(&self) -> Result<Vec<SensorReading>> {
        Ok(self.store.get_all().await)
    }

    async fn between(&self, start: TimestampMs, end: TimestampMs) -> Result<Vec<SensorReading>> {
        let mut readings = self
            .store
            .query(|primary, index| {
                index
                    .ids_between(start, end)
                    .into_iter()
                    // An id without a primary entry is skipped, not an error.
                    .filter_map(|id| primary.get(id).cloned())
                    .collect::<Vec<_>>()
            })
            .await;

        readings.sort_by_key(|reading| reading.measured_at);
        Ok(readings)
    }

    async fn by_kind(&self, kind: MeasurementKind) -> Result<Vec<SensorReading>> {
        Ok(self
            .store
            .query(|primary, _| {
                primary
                    .values()
                    .filter(|reading| reading.kind == kind)
                    .cloned()
                    .collect()
            })
            .await)
    }
}
