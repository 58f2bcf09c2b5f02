//! Application layer for the meteo platform
//!
//! Services hold the simulated model runs and alert evaluation; controllers
//! are the thin glue the outer boundary talks to. Both are constructed by
//! the composition root and resolved through the component registry.

pub mod controllers;
pub mod services;

pub use controllers::{
    AlertsController, DataController, ForecastController, IngestionController,
};
pub use services::{AlertService, ForecastService};
