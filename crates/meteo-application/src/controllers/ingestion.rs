//! Ingestion controller
//!
//! Facade over the simulated data sources: polls every configured source,
//! validates and normalises what came back, and stores the surviving
//! readings. Sources are synthetic; a "poll" suspends for a simulated
//! network delay and fabricates deterministic channel values.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use meteo_domain::entities::SensorReading;
use meteo_domain::error::Result;
use meteo_domain::ports::{Clock, SensorReadingRepository};
use meteo_domain::value_objects::MeasurementKind;

/// Simulated network delay of one source poll.
const POLL_DELAY: Duration = Duration::from_millis(100);

/// Status of one data source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub name: String,
    pub active: bool,
    pub last_polled: DateTime<Utc>,
    pub kind: String,
}

/// Status report over all configured sources.
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatusReport {
    pub total_sources: usize,
    pub sources: Vec<SourceStatus>,
}

/// Controller polling the configured data sources.
pub struct IngestionController {
    readings: Arc<dyn SensorReadingRepository>,
    clock: Arc<dyn Clock>,
    sources: RwLock<Vec<String>>,
}

impl IngestionController {
    pub fn new(
        readings: Arc<dyn SensorReadingRepository>,
        clock: Arc<dyn Clock>,
        sources: Vec<String>,
    ) -> Self {
        Self {
            readings,
            clock,
            sources: RwLock::new(sources),
        }
    }

    /// Poll every source, process the results, and return what was
    /// collected.
    pub async fn poll_sources(&self) -> Result<Vec<SensorReading>> {
        let sources = self.sources.read().await.clone();
        info!(sources = sources.len(), "polling data sources");

        let mut collected = Vec::new();
        for source in &sources {
            let batch = self.fetch_from_source(source).await;
            info!(source, records = batch.len(), "source polled");
            collected.extend(batch);
        }

        let stored = self.process(&collected).await?;
        info!(
            collected = collected.len(),
            stored, "ingestion cycle finished"
        );
        Ok(collected)
    }

    /// Validate, normalise, and store a batch of readings.
    ///
    /// Returns how many readings survived validation and were stored.
    pub async fn process(&self, readings: &[SensorReading]) -> Result<usize> {
        let mut stored = 0;
        for reading in readings {
            if !validate(reading) {
                warn!(reading = %reading.id, "invalid reading dropped");
                continue;
            }
            self.readings.save(normalize(reading)).await?;
            debug!(reading = %reading.id, "reading stored");
            stored += 1;
        }
        Ok(stored)
    }

    pub async fn add_source(&self, source: &str) {
        let mut sources = self.sources.write().await;
        if !sources.iter().any(|existing| existing == source) {
            sources.push(source.to_string());
            info!(source, "source added");
        }
    }

    pub async fn source_status(&self) -> SourceStatusReport {
        let now = self.clock.now();
        let sources = self.sources.read().await;
        let statuses = sources
            .iter()
            .map(|name| SourceStatus {
                name: name.clone(),
                active: true,
                last_polled: now,
                kind: if name.starts_with("station") {
                    "station".to_string()
                } else {
                    "radar".to_string()
                },
            })
            .collect();

        SourceStatusReport {
            total_sources: sources.len(),
            sources: statuses,
        }
    }

    /// Simulated fetch from one source.
    async fn fetch_from_source(&self, source: &str) -> Vec<SensorReading> {
        tokio::time::sleep(POLL_DELAY).await;

        let now = self.clock.now_ms();

        if let Some(station_id) = source.strip_prefix("station_") {
            let seed = station_id.parse::<i64>().unwrap_or(0);
            vec![
                SensorReading::new(
                    format!("{station_id}_temp_{now}"),
                    now,
                    15.0 + (seed % 10) as f64,
                    MeasurementKind::Temperature,
                ),
                SensorReading::new(
                    format!("{station_id}_hum_{now}"),
                    now,
                    60.0 + (seed % 20) as f64,
                    MeasurementKind::Humidity,
                ),
                SensorReading::new(
                    format!("{station_id}_pres_{now}"),
                    now,
                    750.0 + (seed % 10) as f64,
                    MeasurementKind::Pressure,
                ),
                SensorReading::new(
                    format!("{station_id}_wind_{now}"),
                    now,
                    5.0 + (seed % 15) as f64,
                    MeasurementKind::WindSpeed,
                ),
            ]
        } else if source.starts_with("radar") {
            vec![SensorReading::new(
                format!("radar_precip_{now}"),
                now,
                2.5,
                MeasurementKind::Precipitation,
            )]
        } else {
            Vec::new()
        }
    }
}

/// Plausibility ranges per measurement kind, inclusive.
fn validate(reading: &SensorReading) -> bool {
    let (min, max) = match reading.kind {
        MeasurementKind::Temperature => (-60.0, 60.0),
        MeasurementKind::Humidity => (0.0, 100.0),
        MeasurementKind::Pressure => (600.0, 800.0),
        MeasurementKind::WindSpeed => (0.0, 100.0),
        MeasurementKind::Precipitation => (0.0, 500.0),
    };
    min <= reading.value && reading.value <= max
}

/// Round the value to the precision kept for its kind.
fn normalize(reading: &SensorReading) -> SensorReading {
    let decimals = match reading.kind {
        MeasurementKind::Temperature
        | MeasurementKind::Humidity
        | MeasurementKind::WindSpeed => 1,
        MeasurementKind::Pressure => 0,
        MeasurementKind::Precipitation => 2,
    };
    let factor = 10f64.powi(decimals);

    SensorReading {
        value: (reading.value * factor).round() / factor,
        ..reading.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_storage::InMemorySensorReadingRepository;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn controller(sources: Vec<&str>) -> (IngestionController, Arc<InMemorySensorReadingRepository>) {
        let repo = Arc::new(InMemorySensorReadingRepository::new());
        let clock = Arc::new(FixedClock(
            DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
        ));
        let controller = IngestionController::new(
            repo.clone(),
            clock,
            sources.into_iter().map(String::from).collect(),
        );
        (controller, repo)
    }

    #[tokio::test]
    async fn polling_a_station_yields_four_channels() {
        let (controller, repo) = controller(vec!["station_26850"]);

        let collected = controller.poll_sources().await.unwrap();

        assert_eq!(collected.len(), 4);
        assert_eq!(repo.get_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn polling_a_radar_yields_precipitation() {
        let (controller, repo) = controller(vec!["radar_minsk"]);

        let collected = controller.poll_sources().await.unwrap();

        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].kind, MeasurementKind::Precipitation);
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn out_of_range_readings_are_dropped() {
        let (controller, repo) = controller(vec![]);

        let batch = vec![
            SensorReading::new("ok", 100, 21.37, MeasurementKind::Temperature),
            SensorReading::new("hot", 100, 90.0, MeasurementKind::Temperature),
            SensorReading::new("wet", 100, 120.0, MeasurementKind::Humidity),
        ];

        let stored = controller.process(&batch).await.unwrap();

        assert_eq!(stored, 1);
        let kept = repo.get_all().await.unwrap();
        assert_eq!(kept.len(), 1);
        // Normalised to one decimal.
        assert!((kept[0].value - 21.4).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn pressure_is_rounded_to_integers() {
        let (controller, repo) = controller(vec![]);

        controller
            .process(&[SensorReading::new(
                "p",
                100,
                748.6,
                MeasurementKind::Pressure,
            )])
            .await
            .unwrap();

        let kept = repo.get_all().await.unwrap();
        assert!((kept[0].value - 749.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn add_source_is_append_once() {
        let (controller, _) = controller(vec!["station_26850"]);

        controller.add_source("radar_minsk").await;
        controller.add_source("radar_minsk").await;

        let report = controller.source_status().await;
        assert_eq!(report.total_sources, 2);
        assert_eq!(report.sources[1].kind, "radar");
    }
}
