//! Generic indexed store

use std::collections::HashMap;

use tokio::sync::RwLock;

use meteo_domain::entities::{Alert, Forecast, SensorReading, WeatherObservation};

/// An entity with a stable identifier, storable in an [`IndexedStore`].
pub trait StoredEntity: Clone + Send + Sync + 'static {
    fn entity_id(&self) -> &str;
}

impl StoredEntity for SensorReading {
    fn entity_id(&self) -> &str {
        &self.id
    }
}

impl StoredEntity for Forecast {
    fn entity_id(&self) -> &str {
        &self.id
    }
}

impl StoredEntity for Alert {
    fn entity_id(&self) -> &str {
        &self.id
    }
}

impl StoredEntity for WeatherObservation {
    fn entity_id(&self) -> &str {
        &self.id
    }
}

/// Maintainer of one secondary index, invoked on every write.
///
/// `apply` runs inside the store's exclusive lock and receives the previous
/// version of the entity when the write is an overwrite, so an indexed
/// attribute that changed between writes can be repaired: the identifier is
/// removed from its stale bucket before landing in the new one.
pub trait SecondaryIndex<E>: Send + Sync + 'static {
    fn apply(&mut self, previous: Option<&E>, entity: &E);
}

struct StoreInner<E, X> {
    primary: HashMap<String, E>,
    index: X,
}

/// Primary identifier map plus one secondary index under a single lock.
///
/// The exclusive-write/shared-read lock is what keeps the "primary and
/// index never diverge" invariant under concurrent tasks: `upsert` updates
/// both sides before releasing the lock, and [`IndexedStore::query`] hands
/// readers a consistent snapshot of both.
pub struct IndexedStore<E, X> {
    inner: RwLock<StoreInner<E, X>>,
}

impl<E, X> IndexedStore<E, X>
where
    E: StoredEntity,
    X: SecondaryIndex<E>,
{
    pub fn new(index: X) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                primary: HashMap::new(),
                index,
            }),
        }
    }

    /// Insert or overwrite an entity and maintain the index in the same
    /// write. Idempotent: re-upserting identical content leaves the store
    /// unchanged.
    pub async fn upsert(&self, entity: E) {
        let mut inner = self.inner.write().await;
        let previous = inner.primary.get(entity.entity_id()).cloned();
        inner.index.apply(previous.as_ref(), &entity);
        inner
            .primary
            .insert(entity.entity_id().to_string(), entity);
    }

    /// Point lookup; a miss is an absent result, not an error.
    pub async fn get_by_id(&self, id: &str) -> Option<E> {
        self.inner.read().await.primary.get(id).cloned()
    }

    /// Every stored entity, order unspecified.
    pub async fn get_all(&self) -> Vec<E> {
        self.inner.read().await.primary.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.primary.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.primary.is_empty()
    }

    /// Run a query over the primary map and the index as one consistent
    /// snapshot, under the shared lock.
    pub async fn query<R>(&self, f: impl FnOnce(&HashMap<String, E>, &X) -> R) -> R {
        let inner = self.inner.read().await;
        f(&inner.primary, &inner.index)
    }
}

impl<E, X> Default for IndexedStore<E, X>
where
    E: StoredEntity,
    X: SecondaryIndex<E> + Default,
{
    fn default() -> Self {
        Self::new(X::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_domain::value_objects::MeasurementKind;

    /// Counts how many times `apply` saw a previous version.
    #[derive(Default)]
    struct Recording {
        writes: usize,
        overwrites: usize,
    }

    impl SecondaryIndex<SensorReading> for Recording {
        fn apply(&mut self, previous: Option<&SensorReading>, _entity: &SensorReading) {
            self.writes += 1;
            if previous.is_some() {
                self.overwrites += 1;
            }
        }
    }

    fn reading(id: &str, at: i64) -> SensorReading {
        SensorReading::new(id, at, 1.0, MeasurementKind::Temperature)
    }

    #[tokio::test]
    async fn upsert_passes_previous_version_to_index() {
        let store = IndexedStore::new(Recording::default());

        store.upsert(reading("r1", 100)).await;
        store.upsert(reading("r1", 200)).await;
        store.upsert(reading("r2", 300)).await;

        let (writes, overwrites) = store.query(|_, index| (index.writes, index.overwrites)).await;
        assert_eq!(writes, 3);
        assert_eq!(overwrites, 1);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn get_by_id_miss_is_none() {
        let store: IndexedStore<SensorReading, Recording> = IndexedStore::default();
        assert!(store.get_by_id("absent").await.is_none());
        assert!(store.is_empty().await);
    }
}
