//! Controllers
//!
//! Thin glue between the outer boundary and the repositories/services. A
//! controller method typically calls one collaborator and reshapes the
//! result; anything heavier lives in the services.

pub mod alerts;
pub mod data;
pub mod forecast;
pub mod ingestion;

pub use alerts::{AlertStatistics, AlertsController, ManualAlert};
pub use data::{DataController, SensorStatus};
pub use forecast::{ForecastController, RegionForecastStats};
pub use ingestion::{IngestionController, SourceStatus, SourceStatusReport};
