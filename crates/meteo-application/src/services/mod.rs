//! Application services

pub mod alert;
pub mod forecast;

pub use alert::AlertService;
pub use forecast::{DistributionStats, ForecastService, ProbabilisticSummary, RangeStats};
