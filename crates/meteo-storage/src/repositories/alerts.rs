//! Alert repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use meteo_domain::entities::{Alert, AlertNotice};
use meteo_domain::error::Result;
use meteo_domain::ports::AlertRepository;
use meteo_domain::value_objects::TimestampMs;

use crate::index::NoticeIndex;
use crate::store::IndexedStore;

/// In-memory alert store with a derived notice twin per alert.
pub struct InMemoryAlertRepository {
    store: IndexedStore<Alert, NoticeIndex>,
}

impl InMemoryAlertRepository {
    pub fn new() -> Self {
        Self {
            store: IndexedStore::default(),
        }
    }
}

impl Default for InMemoryAlertRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlertRepository for InMemoryAlertRepository {
    async fn save(&self, alert: Alert) -> Result<()> {
        self.store.upsert(alert).await;
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Alert>> {
        Ok(self.store.get_by_id(id).await)
    }

    async fn get_all(&self) -> Result<Vec<Alert>> {
        Ok(self.store.get_all().await)
    }

    async fn active_notices(&self, now: TimestampMs) -> Result<Vec<AlertNotice>> {
        Ok(self.store.query(|_, index| index.active(now)).await)
    }

    async fn active_alerts(&self, now: DateTime<Utc>) -> Result<Vec<Alert>> {
        Ok(self
            .store
            .query(|primary, _| {
                primary
                    .values()
                    .filter(|alert| {
                        alert.is_active && alert.valid_from <= now && now <= alert.valid_to
                    })
                    .cloned()
                    .collect()
            })
            .await)
    }
}
