//! Forecast calculation service
//!
//! The "model run" is a hardcoded arithmetic formula over the horizon plus
//! a simulated compute delay; this is a teaching simulation, not numerical
//! weather prediction.

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use futures::future::try_join_all;
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use meteo_domain::entities::{Forecast, ForecastPoint};
use meteo_domain::error::{Error, Result};
use meteo_domain::ports::Clock;
use meteo_domain::value_objects::ModelParameters;

/// Simulated duration of one model run.
const COMPUTE_DELAY: Duration = Duration::from_millis(500);

/// Spacing of forecast points in hours.
const POINT_STEP_HOURS: u32 = 3;

/// Service running the simulated forecast model.
pub struct ForecastService {
    clock: Arc<dyn Clock>,
}

impl ForecastService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Run one forecast calculation for a region.
    ///
    /// Suspends for the simulated compute delay, then produces a point every
    /// three hours across the horizon from the fixed formula.
    pub async fn calculate(&self, region: &str, params: &ModelParameters) -> Result<Forecast> {
        tokio::time::sleep(COMPUTE_DELAY).await;

        let now = self.clock.now();
        let mut points = Vec::new();
        let mut hour = 0u32;
        while hour <= params.forecast_horizon {
            let point_time = now + TimeDelta::hours(i64::from(hour));
            let h = f64::from(hour);
            points.push(ForecastPoint {
                time: point_time.format("%H:%M").to_string(),
                temperature: 15.0 + h * 0.1 + f64::from(hour % 10) - 5.0,
                humidity: (80.0 - h * 0.5).max(40.0),
                wind_speed: 5.0 + f64::from(hour % 24) * 0.3,
            });
            hour += POINT_STEP_HOURS;
        }

        let forecast = Forecast {
            id: Uuid::new_v4().to_string(),
            model_type: params.algorithm.clone(),
            calculation_time: now,
            valid_from: now,
            valid_to: now + TimeDelta::hours(i64::from(params.forecast_horizon)),
            region: region.to_string(),
            points,
        };

        debug!(forecast = %forecast.id, region, "calculated forecast");
        Ok(forecast)
    }

    /// Run an ensemble of horizon-perturbed members concurrently.
    pub async fn calculate_ensemble(
        &self,
        region: &str,
        params: &ModelParameters,
        ensemble_size: usize,
    ) -> Result<Vec<Forecast>> {
        let half = (ensemble_size / 2) as i64;
        let runs = (0..ensemble_size).map(|member| {
            let perturbed = ModelParameters {
                forecast_horizon: perturb_horizon(params.forecast_horizon, member as i64 - half),
                ..params.clone()
            };
            async move { self.calculate(region, &perturbed).await }
        });

        try_join_all(runs).await
    }

    /// Run a 10-member ensemble and summarise the first-point spread.
    pub async fn probabilistic_summary(
        &self,
        region: &str,
        params: &ModelParameters,
        confidence_level: f64,
    ) -> Result<ProbabilisticSummary> {
        let ensemble = self.calculate_ensemble(region, params, 10).await?;

        let firsts: Vec<&ForecastPoint> = ensemble
            .iter()
            .filter_map(|forecast| forecast.points.first())
            .collect();
        if firsts.is_empty() {
            return Err(Error::internal("ensemble produced no forecast points"));
        }

        let temperatures: Vec<f64> = firsts.iter().map(|p| p.temperature).collect();
        let humidities: Vec<f64> = firsts.iter().map(|p| p.humidity).collect();
        let wind_speeds: Vec<f64> = firsts.iter().map(|p| p.wind_speed).collect();

        Ok(ProbabilisticSummary {
            region: region.to_string(),
            confidence_level,
            ensemble_size: ensemble.len(),
            temperature: DistributionStats::from_samples(&temperatures),
            humidity: RangeStats::from_samples(&humidities),
            wind_speed: RangeStats::from_samples(&wind_speeds),
        })
    }
}

fn perturb_horizon(horizon: u32, delta: i64) -> u32 {
    let perturbed = i64::from(horizon) + delta;
    perturbed.max(i64::from(POINT_STEP_HOURS)) as u32
}

/// Spread statistics of an ensemble across one variable.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub percentile_10: f64,
    pub percentile_90: f64,
}

impl DistributionStats {
    fn from_samples(samples: &[f64]) -> Self {
        let sorted: Vec<f64> = samples
            .iter()
            .copied()
            .sorted_by(|a, b| a.total_cmp(b))
            .collect();
        let mean = mean(&sorted);
        Self {
            mean,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            std_dev: std_dev(&sorted, mean),
            percentile_10: sorted[(sorted.len() as f64 * 0.1) as usize],
            percentile_90: sorted[(sorted.len() as f64 * 0.9) as usize],
        }
    }
}

/// Mean and range of an ensemble across one variable.
#[derive(Debug, Clone, Serialize)]
pub struct RangeStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl RangeStats {
    fn from_samples(samples: &[f64]) -> Self {
        Self {
            mean: mean(samples),
            min: samples.iter().copied().fold(f64::INFINITY, f64::min),
            max: samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Probabilistic forecast summary built from an ensemble run.
#[derive(Debug, Clone, Serialize)]
pub struct ProbabilisticSummary {
    pub region: String,
    pub confidence_level: f64,
    pub ensemble_size: usize,
    pub temperature: DistributionStats,
    pub humidity: RangeStats,
    pub wind_speed: RangeStats,
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample standard deviation; zero for fewer than two samples.
fn std_dev(samples: &[f64], mean: f64) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let variance = samples
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (samples.len() - 1) as f64;
    variance.sqrt()
}
