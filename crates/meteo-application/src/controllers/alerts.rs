//! Alerts controller

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use meteo_domain::entities::{Alert, AlertNotice};
use meteo_domain::error::Result;
use meteo_domain::ports::{AlertRepository, Clock};
use meteo_domain::value_objects::AlertLevel;

use crate::services::AlertService;

/// Draft of a manually issued alert; unset fields fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct ManualAlert {
    pub level: Option<AlertLevel>,
    pub kind: Option<String>,
    pub region: Option<String>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub description: String,
}

/// Aggregate statistics over the stored alerts.
#[derive(Debug, Clone, Serialize)]
pub struct AlertStatistics {
    pub total_alerts: usize,
    pub active_alerts: usize,
    pub alerts_by_level: Vec<(AlertLevel, usize)>,
    pub latest_alert: Option<DateTime<Utc>>,
}

/// Controller for alert generation and management.
pub struct AlertsController {
    service: Arc<AlertService>,
    alerts: Arc<dyn AlertRepository>,
    clock: Arc<dyn Clock>,
}

impl AlertsController {
    pub fn new(
        service: Arc<AlertService>,
        alerts: Arc<dyn AlertRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            service,
            alerts,
            clock,
        }
    }

    /// Evaluate the thresholds for a station and return what was generated.
    pub async fn check_and_generate(&self, station_id: &str) -> Result<Vec<Alert>> {
        info!(station = station_id, "checking alert conditions");

        let alerts = self.service.check_station(station_id).await?;
        if !alerts.is_empty() {
            warn!(station = station_id, count = alerts.len(), "alerts generated");
        }
        Ok(alerts)
    }

    /// Alerts flagged active whose validity window contains the current
    /// time.
    pub async fn active_alerts(&self) -> Result<Vec<Alert>> {
        self.alerts.active_alerts(self.clock.now()).await
    }

    /// Notices whose validity window contains the current time, regardless
    /// of the alert flag.
    pub async fn active_notices(&self) -> Result<Vec<AlertNotice>> {
        self.alerts.active_notices(self.clock.now_ms()).await
    }

    /// Issue an alert by hand, e.g. from a duty forecaster.
    pub async fn create_manual_alert(&self, draft: ManualAlert) -> Result<Alert> {
        let now = self.clock.now();
        let alert = Alert {
            id: Uuid::new_v4().to_string(),
            level: draft.level.unwrap_or(AlertLevel::Warning),
            kind: draft
                .kind
                .unwrap_or_else(|| "Thunderstorm / Lightning".to_string()),
            region: draft.region.unwrap_or_else(|| "Minsk (all districts)".to_string()),
            valid_from: draft.valid_from.unwrap_or(now),
            valid_to: draft.valid_to.unwrap_or(now + TimeDelta::hours(3)),
            description: draft.description,
            is_active: true,
        };

        self.alerts.save(alert.clone()).await?;
        warn!(alert = %alert.id, kind = %alert.kind, "manual alert issued");
        Ok(alert)
    }

    /// Clear the active flag of an alert; returns false when the id is
    /// unknown. The notice twin keeps answering window queries either way.
    pub async fn deactivate(&self, alert_id: &str) -> Result<bool> {
        let Some(mut alert) = self.alerts.get_by_id(alert_id).await? else {
            return Ok(false);
        };

        alert.is_active = false;
        self.alerts.save(alert).await?;
        info!(alert = alert_id, "alert deactivated");
        Ok(true)
    }

    pub async fn statistics(&self) -> Result<AlertStatistics> {
        let all = self.alerts.get_all().await?;
        let active = self.active_alerts().await?;

        let alerts_by_level = AlertLevel::ALL
            .iter()
            .map(|level| {
                let count = all.iter().filter(|alert| alert.level == *level).count();
                (*level, count)
            })
            .collect();

        Ok(AlertStatistics {
            total_alerts: all.len(),
            active_alerts: active.len(),
            alerts_by_level,
            latest_alert: all.iter().map(|alert| alert.valid_from).max(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_domain::ports::ObservationRepository;
    use meteo_domain::value_objects::AlertThresholds;
    use meteo_storage::{InMemoryAlertRepository, InMemoryObservationRepository};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn controller() -> AlertsController {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(now()));
        let observations: Arc<dyn ObservationRepository> =
            Arc::new(InMemoryObservationRepository::new(clock.clone()));
        let alerts: Arc<dyn AlertRepository> = Arc::new(InMemoryAlertRepository::new());
        let service = Arc::new(AlertService::new(
            observations,
            alerts.clone(),
            AlertThresholds::default(),
            clock.clone(),
        ));
        AlertsController::new(service, alerts, clock)
    }

    #[tokio::test]
    async fn manual_alert_defaults_to_a_three_hour_warning() {
        let controller = controller();

        let alert = controller
            .create_manual_alert(ManualAlert {
                description: "Issued by duty forecaster".to_string(),
                ..ManualAlert::default()
            })
            .await
            .unwrap();

        assert_eq!(alert.level, AlertLevel::Warning);
        assert_eq!(alert.valid_to - alert.valid_from, TimeDelta::hours(3));

        let active = controller.active_alerts().await.unwrap();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn deactivate_clears_the_flag_but_not_the_notice() {
        let controller = controller();
        let alert = controller
            .create_manual_alert(ManualAlert::default())
            .await
            .unwrap();

        assert!(controller.deactivate(&alert.id).await.unwrap());

        assert!(controller.active_alerts().await.unwrap().is_empty());
        // The window-based signal is independent of the flag.
        assert_eq!(controller.active_notices().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deactivating_an_unknown_alert_reports_false() {
        let controller = controller();
        assert!(!controller.deactivate("missing").await.unwrap());
    }

    #[tokio::test]
    async fn statistics_count_by_level() {
        let controller = controller();
        controller
            .create_manual_alert(ManualAlert {
                level: Some(AlertLevel::Danger),
                ..ManualAlert::default()
            })
            .await
            .unwrap();
        controller
            .create_manual_alert(ManualAlert::default())
            .await
            .unwrap();

        let stats = controller.statistics().await.unwrap();
        assert_eq!(stats.total_alerts, 2);
        assert_eq!(stats.active_alerts, 2);
        let danger = stats
            .alerts_by_level
            .iter()
            .find(|(level, _)| *level == AlertLevel::Danger)
            .unwrap();
        assert_eq!(danger.1, 1);
        assert_eq!(stats.latest_alert, Some(now()));
    }
}
