//! Forecast controller

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use meteo_domain::entities::{Forecast, ForecastDigest};
use meteo_domain::error::Result;
use meteo_domain::ports::ForecastRepository;
use meteo_domain::value_objects::ModelParameters;

use crate::services::ForecastService;

/// Aggregate statistics over the forecasts stored for one region.
#[derive(Debug, Clone, Serialize)]
pub struct RegionForecastStats {
    pub region: String,
    pub forecast_count: usize,
    pub latest_forecast_id: Option<String>,
    pub latest_model: Option<String>,
    pub models_used: Vec<String>,
    pub first_calculation: Option<DateTime<Utc>>,
    pub last_calculation: Option<DateTime<Utc>>,
}

/// Controller for forecast calculation and retrieval.
pub struct ForecastController {
    service: Arc<ForecastService>,
    forecasts: Arc<dyn ForecastRepository>,
}

impl ForecastController {
    pub fn new(service: Arc<ForecastService>, forecasts: Arc<dyn ForecastRepository>) -> Self {
        Self { service, forecasts }
    }

    /// Run the model for a region and store the result.
    pub async fn calculate_forecast(
        &self,
        region: &str,
        params: &ModelParameters,
    ) -> Result<Forecast> {
        info!(region, model = %params.algorithm, "calculating forecast");

        let forecast = self.service.calculate(region, params).await?;
        self.forecasts.save(forecast.clone()).await?;

        info!(forecast = %forecast.id, "forecast stored");
        Ok(forecast)
    }

    /// The most recently calculated forecast for a region.
    pub async fn latest_forecast(&self, region: &str) -> Result<Option<Forecast>> {
        self.forecasts.latest_for_region(region).await
    }

    /// Digests for a region that are still inside the freshness window.
    pub async fn current_digests(&self, region: &str) -> Result<Vec<ForecastDigest>> {
        self.forecasts.current_for_region(region).await
    }

    /// Run an ensemble for a region and store every member.
    pub async fn calculate_ensemble(
        &self,
        region: &str,
        params: &ModelParameters,
        ensemble_size: usize,
    ) -> Result<Vec<Forecast>> {
        let members = self
            .service
            .calculate_ensemble(region, params, ensemble_size)
            .await?;

        for member in &members {
            self.forecasts.save(member.clone()).await?;
        }

        info!(region, members = members.len(), "ensemble stored");
        Ok(members)
    }

    pub async fn region_statistics(&self, region: &str) -> Result<RegionForecastStats> {
        let forecasts = self.forecasts.all_for_region(region).await?;

        let latest = forecasts
            .iter()
            .max_by_key(|forecast| forecast.calculation_time);
        let models_used: BTreeSet<String> = forecasts
            .iter()
            .map(|forecast| forecast.model_type.clone())
            .collect();

        Ok(RegionForecastStats {
            region: region.to_string(),
            forecast_count: forecasts.len(),
            latest_forecast_id: latest.map(|forecast| forecast.id.clone()),
            latest_model: latest.map(|forecast| forecast.model_type.clone()),
            models_used: models_used.into_iter().collect(),
            first_calculation: forecasts
                .iter()
                .map(|forecast| forecast.calculation_time)
                .min(),
            last_calculation: latest.map(|forecast| forecast.calculation_time),
        })
    }
}
