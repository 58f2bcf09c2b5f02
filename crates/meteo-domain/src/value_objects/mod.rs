//! Domain value objects
//!
//! Immutable values without identity: geographic coordinates, severity
//! scales, measurement kinds, and the parameter/threshold records that
//! configure the simulated model runs and alert checks.

pub mod geo;
pub mod levels;
pub mod measurement;
pub mod parameters;

pub use geo::GeoPoint;
pub use levels::{AlertLevel, NoticeSeverity};
pub use measurement::MeasurementKind;
pub use parameters::{AlertThresholds, ModelParameters};

/// Millisecond epoch timestamp, the unit of the time-bucket index and the
/// derived legacy-shape twins.
pub type TimestampMs = i64;
