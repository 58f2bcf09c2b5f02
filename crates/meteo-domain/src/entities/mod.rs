//! Domain entities
//!
//! Records with stable identity stored by the repository layer. Two of them
//! carry a dual representation: the forecast has a derived [`ForecastDigest`]
//! and the alert a derived [`AlertNotice`], both recomputed at write time so
//! the canonical entity and its twin are never observed inconsistent.

pub mod alert;
pub mod forecast;
pub mod observation;
pub mod reading;
pub mod station;

pub use alert::{Alert, AlertNotice};
pub use forecast::{Forecast, ForecastDigest, ForecastPoint};
pub use observation::WeatherObservation;
pub use reading::SensorReading;
pub use station::{Station, StationStatus};
