//! Forecast repository

use std::sync::Arc;

use async_trait::async_trait;

use meteo_domain::entities::{Forecast, ForecastDigest};
use meteo_domain::error::Result;
use meteo_domain::ports::{Clock, ForecastRepository};
use meteo_domain::value_objects::TimestampMs;

use crate::index::ForecastIndex;
use crate::store::IndexedStore;

/// Forecasts older than this drop out of `current_for_region` results.
const FRESHNESS_WINDOW_MS: TimestampMs = 24 * 3_600 * 1_000;

/// In-memory forecast store with a region index and a digest twin.
///
/// Freshness is evaluated against the injected clock at query time: a
/// digest "expires" out of `current_for_region` without ever being removed
/// from the index.
pub struct InMemoryForecastRepository {
    store: IndexedStore<Forecast, ForecastIndex>,
    clock: Arc<dyn Clock>,
}

impl InMemoryForecastRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: IndexedStore::default(),
            clock,
        }
    }
}

#[async_trait]
impl ForecastRepository for InMemoryForecastRepository {
    async fn save(&self, forecast: Forecast) -> Result<()> {
        self.store.upsert(forecast).await;
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Forecast>> {
        Ok(self.store.get_by_id(id).await)
    }

    async fn get_all(&self) -> Result<Vec<Forecast>> {
        Ok(self.store.get_all().await)
    }

    async fn current_for_region(&self, region: &str) -> Result<Vec<ForecastDigest>> {
        let now = self.clock.now_ms();
        Ok(self
            .store
            .query(|_, index| {
                index
                    .region_ids(region)
                    .iter()
                    .filter_map(|id| index.digest(id))
                    .filter(|digest| now - digest.created_at <= FRESHNESS_WINDOW_MS)
                    .cloned()
                    .collect()
            })
            .await)
    }

    async fn all_for_region(&self, region: &str) -> Result<Vec<Forecast>> {
        Ok(self
            .store
            .query(|primary, index| {
                index
                    .region_ids(region)
                    .iter()
                    .filter_map(|id| primary.get(id).cloned())
                    .collect()
            })
            .await)
    }

    async fn latest_for_region(&self, region: &str) -> Result<Option<Forecast>> {
        let forecasts = self.all_for_region(region).await?;
        Ok(forecasts
            .into_iter()
            .max_by_key(|forecast| forecast.calculation_time))
    }
}
