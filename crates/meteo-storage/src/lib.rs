//! In-memory indexed repositories for the meteo platform
//!
//! Each repository wraps an [`IndexedStore`]: a primary identifier map plus
//! one entity-specific secondary index, both mutated under a single write
//! lock so a reader never observes the primary store and an index diverged.
//! Data is not persisted and is lost on restart; nothing is ever evicted.
//!
//! ## Architecture
//!
//! ```text
//! upsert(entity)
//!     │  exclusive lock
//!     ▼
//! ┌─────────────────────────────────────────────┐
//! │ StoreInner                                  │
//! │   primary: id → entity                      │
//! │   index.apply(previous, entity)             │  ← repairs stale buckets
//! └─────────────────────────────────────────────┘
//!     ▲  shared lock
//!     │
//! between / current_for_region / active_notices ...
//! ```

pub mod index;
pub mod repositories;
pub mod store;

pub use index::{ForecastIndex, NoticeIndex, StationIndex, TimeBucketIndex};
pub use repositories::{
    InMemoryAlertRepository, InMemoryForecastRepository, InMemoryObservationRepository,
    InMemorySensorReadingRepository,
};
pub use store::{IndexedStore, SecondaryIndex, StoredEntity};
