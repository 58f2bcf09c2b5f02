//! Infrastructure layer for the meteo platform
//!
//! Cross-cutting technical concerns: configuration loading, logging setup,
//! and the composition root that registers every component into the
//! registry once at startup.

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod logging;

pub use bootstrap::{AppContext, init_app, init_test_app};
pub use config::{AppConfig, ConfigLoader};
pub use logging::init_logging;
