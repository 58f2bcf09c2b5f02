//! meteo - weather-monitoring platform simulation
//!
//! Facade crate: re-exports the layer crates and provides the runtime loop
//! behind the `meteo` binary. One demonstration cycle runs at startup; the
//! periodic tasks then poll sources, refresh the forecast, and evaluate
//! alert conditions on the configured intervals until Ctrl-C.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

pub use meteo_application as application;
pub use meteo_domain as domain;
pub use meteo_infrastructure as infrastructure;

use meteo_domain::entities::WeatherObservation;
use meteo_domain::error::Result;
use meteo_domain::value_objects::ModelParameters;
use meteo_infrastructure::{AppContext, ConfigLoader, init_app, init_logging};

/// Load configuration, wire the context, and run the platform.
///
/// With `once` set, a single cycle runs and the process exits; otherwise
/// the periodic tasks keep running until a shutdown signal arrives.
pub async fn run(config_path: Option<&Path>, once: bool) -> Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = config_path {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;

    init_logging(&config.logging)?;
    info!("starting weather monitoring platform");

    let context = init_app(config)?;

    run_cycle(&context).await?;
    if once {
        info!("single cycle finished");
        return Ok(());
    }

    run_scheduled(&context).await
}

/// One full platform cycle: ingest, forecast, evaluate alerts.
async fn run_cycle(context: &AppContext) -> Result<()> {
    let config = context.config();

    let ingestion = context.ingestion_controller()?;
    let collected = ingestion.poll_sources().await?;
    info!(readings = collected.len(), "sources polled");

    let data = context.data_controller()?;
    data.ingest(synthetic_observation(&config.stations.default))
        .await?;

    let forecast_controller = context.forecast_controller()?;
    let params = ModelParameters {
        algorithm: config.forecast.default_model.clone(),
        ..ModelParameters::default()
    };
    let forecast = forecast_controller
        .calculate_forecast(&config.forecast.default_region, &params)
        .await?;
    let current = forecast_controller
        .current_digests(&config.forecast.default_region)
        .await?;
    info!(
        forecast = %forecast.id,
        region = %forecast.region,
        current = current.len(),
        "forecast refreshed"
    );

    let alerts_controller = context.alerts_controller()?;
    let generated = alerts_controller
        .check_and_generate(&config.stations.default)
        .await?;
    let active = alerts_controller.active_alerts().await?;
    info!(
        generated = generated.len(),
        active = active.len(),
        "alert conditions evaluated"
    );

    Ok(())
}

/// Periodic tasks on the configured intervals, until Ctrl-C.
async fn run_scheduled(context: &AppContext) -> Result<()> {
    let config = context.config();

    let ingestion = context.ingestion_controller()?;
    let data = context.data_controller()?;
    let forecast_controller = context.forecast_controller()?;
    let alerts_controller = context.alerts_controller()?;

    let mut ingest_tick =
        tokio::time::interval(Duration::from_secs(config.ingestion.poll_interval_secs));
    let mut forecast_tick =
        tokio::time::interval(Duration::from_secs(config.forecast.update_interval_secs));
    let mut alert_tick =
        tokio::time::interval(Duration::from_secs(config.alerts.check_interval_secs));

    // The startup cycle already ran; consume the immediate first ticks.
    ingest_tick.tick().await;
    forecast_tick.tick().await;
    alert_tick.tick().await;

    info!(
        ingest_secs = config.ingestion.poll_interval_secs,
        forecast_secs = config.forecast.update_interval_secs,
        alert_secs = config.alerts.check_interval_secs,
        "periodic tasks scheduled"
    );

    loop {
        tokio::select! {
            _ = ingest_tick.tick() => {
                if let Err(e) = ingestion.poll_sources().await {
                    error!(error = %e, "ingestion cycle failed");
                }
                if let Err(e) = data.ingest(synthetic_observation(&config.stations.default)).await {
                    error!(error = %e, "observation ingest failed");
                }
            }
            _ = forecast_tick.tick() => {
                let params = ModelParameters {
                    algorithm: config.forecast.default_model.clone(),
                    ..ModelParameters::default()
                };
                if let Err(e) = forecast_controller
                    .calculate_forecast(&config.forecast.default_region, &params)
                    .await
                {
                    error!(error = %e, "forecast update failed");
                }
            }
            _ = alert_tick.tick() => {
                if let Err(e) = alerts_controller
                    .check_and_generate(&config.stations.default)
                    .await
                {
                    error!(error = %e, "alert check failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    info!("weather monitoring platform stopped");
    Ok(())
}

/// Synthetic observation for the default station, standing in for real
/// station telemetry.
fn synthetic_observation(station_id: &str) -> WeatherObservation {
    let seed = station_id.parse::<i64>().unwrap_or(0);
    WeatherObservation {
        id: Uuid::new_v4().to_string(),
        station_id: station_id.to_string(),
        observed_at: Utc::now(),
        temperature: 15.0 + (seed % 10) as f64,
        humidity: 60.0 + (seed % 20) as f64,
        pressure: 750.0 + (seed % 10) as f64,
        wind_speed: 5.0 + (seed % 15) as f64,
        wind_direction: "NW".to_string(),
        precipitation: 0.0,
        phenomena: String::new(),
    }
}
