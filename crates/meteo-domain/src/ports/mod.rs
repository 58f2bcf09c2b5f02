//! Port traits implemented by the outer layers

pub mod clock;
pub mod repositories;

pub use clock::{Clock, SystemClock};
pub use repositories::{
    AlertRepository, ForecastRepository, ObservationRepository, SensorReadingRepository,
};
