//! Configuration types and loading

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    AlertsConfig, AppConfig, ForecastConfig, IngestionConfig, LoggingConfig, StationLocation,
    StationsConfig,
};
