//! Alert evaluation service

use std::sync::Arc;

use chrono::TimeDelta;
use tracing::warn;
use uuid::Uuid;

use meteo_domain::entities::Alert;
use meteo_domain::error::Result;
use meteo_domain::ports::{AlertRepository, Clock, ObservationRepository};
use meteo_domain::value_objects::{AlertLevel, AlertThresholds};

/// Pressure drop across the trend window that signals deteriorating
/// weather, in hPa.
const PRESSURE_DROP_HPA: f64 = 10.0;

/// Service evaluating observations against the configured thresholds.
pub struct AlertService {
    observations: Arc<dyn ObservationRepository>,
    alerts: Arc<dyn AlertRepository>,
    thresholds: AlertThresholds,
    clock: Arc<dyn Clock>,
}

impl AlertService {
    pub fn new(
        observations: Arc<dyn ObservationRepository>,
        alerts: Arc<dyn AlertRepository>,
        thresholds: AlertThresholds,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            observations,
            alerts,
            thresholds,
            clock,
        }
    }

    /// Check the latest observation of a station against every threshold.
    ///
    /// Generated alerts are saved before being returned. A station without
    /// observations produces no alerts.
    pub async fn check_station(&self, station_id: &str) -> Result<Vec<Alert>> {
        let Some(latest) = self.observations.latest_for_station(station_id).await? else {
            return Ok(Vec::new());
        };

        let now = self.clock.now();
        let region = format!("Station {station_id}");
        let mut alerts = Vec::new();

        if latest.wind_speed >= self.thresholds.wind_speed {
            alerts.push(Alert {
                id: Uuid::new_v4().to_string(),
                level: AlertLevel::Danger,
                kind: "Squall wind".to_string(),
                region: region.clone(),
                valid_from: now,
                valid_to: now + TimeDelta::hours(3),
                description: format!("Squall wind up to {} m/s", latest.wind_speed),
                is_active: true,
            });
        }

        if latest.temperature <= self.thresholds.temperature_low {
            alerts.push(Alert {
                id: Uuid::new_v4().to_string(),
                level: AlertLevel::Warning,
                kind: "Severe frost".to_string(),
                region: region.clone(),
                valid_from: now,
                valid_to: now + TimeDelta::hours(12),
                description: format!("Temperature dropped to {}°C", latest.temperature),
                is_active: true,
            });
        } else if latest.temperature >= self.thresholds.temperature_high {
            alerts.push(Alert {
                id: Uuid::new_v4().to_string(),
                level: AlertLevel::Warning,
                kind: "Severe heat".to_string(),
                region: region.clone(),
                valid_from: now,
                valid_to: now + TimeDelta::hours(12),
                description: format!("Temperature rose to {}°C", latest.temperature),
                is_active: true,
            });
        }

        if latest.precipitation >= self.thresholds.precipitation {
            alerts.push(Alert {
                id: Uuid::new_v4().to_string(),
                level: AlertLevel::Warning,
                kind: "Heavy precipitation".to_string(),
                region,
                valid_from: now,
                valid_to: now + TimeDelta::hours(6),
                description: format!("Precipitation rate {} mm/h", latest.precipitation),
                is_active: true,
            });
        }

        for alert in &alerts {
            warn!(alert = %alert.id, kind = %alert.kind, station = station_id, "alert generated");
            self.alerts.save(alert.clone()).await?;
        }

        Ok(alerts)
    }

    /// Check the pressure trend over the station history window.
    ///
    /// A drop of more than [`PRESSURE_DROP_HPA`] across the window raises a
    /// single warning alert.
    pub async fn check_pressure_trend(&self, station_id: &str, hours: i64) -> Result<Vec<Alert>> {
        let mut history = self.observations.station_history(station_id, hours).await?;
        if history.len() < 3 {
            return Ok(Vec::new());
        }
        history.sort_by_key(|observation| observation.observed_at);

        let first = history[0].pressure;
        let last = history[history.len() - 1].pressure;
        let change = last - first;
        if change >= -PRESSURE_DROP_HPA {
            return Ok(Vec::new());
        }

        let now = self.clock.now();
        let alert = Alert {
            id: Uuid::new_v4().to_string(),
            level: AlertLevel::Warning,
            kind: "Rapid pressure drop".to_string(),
            region: format!("Station {station_id}"),
            valid_from: now,
            valid_to: now + TimeDelta::hours(6),
            description: format!(
                "Pressure fell by {:.1} hPa over {hours} hours",
                change.abs()
            ),
            is_active: true,
        };

        warn!(alert = %alert.id, station = station_id, "pressure trend alert generated");
        self.alerts.save(alert.clone()).await?;
        Ok(vec![alert])
    }
}
