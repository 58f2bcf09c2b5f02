//! In-memory repository implementations

pub mod alerts;
pub mod forecasts;
pub mod observations;
pub mod readings;

pub use alerts::InMemoryAlertRepository;
pub use forecasts::InMemoryForecastRepository;
pub use observations::InMemoryObservationRepository;
pub use readings::InMemorySensorReadingRepository;
