//! Weather observation repository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;

use meteo_domain::entities::WeatherObservation;
use meteo_domain::error::Result;
use meteo_domain::ports::{Clock, ObservationRepository};

use crate::index::StationIndex;
use crate::store::IndexedStore;

/// In-memory observation store with a per-station index.
pub struct InMemoryObservationRepository {
    store: IndexedStore<WeatherObservation, StationIndex>,
    clock: Arc<dyn Clock>,
}

impl InMemoryObservationRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: IndexedStore::default(),
            clock,
        }
    }

    async fn for_station(&self, station_id: &str) -> Vec<WeatherObservation> {
        self.store
            .query(|primary, index| {
                index
                    .station_ids(station_id)
                    .iter()
                    .filter_map(|id| primary.get(id).cloned())
                    .collect()
            })
            .await
    }
}

#[async_trait]
impl ObservationRepository for InMemoryObservationRepository {
    async fn save(&self, observation: WeatherObservation) -> Result<()> {
        self.store.upsert(observation).await;
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<WeatherObservation>> {
        Ok(self.store.get_by_id(id).await)
    }

    async fn get_all(&self) -> Result<Vec<WeatherObservation>> {
        Ok(self.store.get_all().await)
    }

    async fn latest_for_station(&self, station_id: &str) -> Result<Option<WeatherObservation>> {
        Ok(self
            .for_station(station_id)
            .await
            .into_iter()
            .max_by_key(|observation| observation.observed_at))
    }

    async fn station_history(
        &self,
        station_id: &str,
        hours: i64,
    ) -> Result<Vec<WeatherObservation>> {
        let cutoff = self.clock.now() - TimeDelta::hours(hours);
        Ok(self
            .for_station(station_id)
            .await
            .into_iter()
            .filter(|observation| observation.observed_at >= cutoff)
            .collect())
    }
}
