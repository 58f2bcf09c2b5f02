//! Data controller

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use meteo_domain::entities::{SensorReading, Station, WeatherObservation};
use meteo_domain::error::Result;
use meteo_domain::ports::{ObservationRepository, SensorReadingRepository};

/// Status of one station as seen by the platform.
#[derive(Debug, Clone, Serialize)]
pub struct SensorStatus {
    pub sensor_id: String,
    pub is_active: bool,
    pub last_update: Option<DateTime<Utc>>,
    pub data_available: bool,
}

/// Controller for observation intake and station management.
pub struct DataController {
    observations: Arc<dyn ObservationRepository>,
    readings: Arc<dyn SensorReadingRepository>,
    stations: RwLock<HashMap<String, Station>>,
}

impl DataController {
    /// Stations from the catalogue start activated.
    pub fn new(
        observations: Arc<dyn ObservationRepository>,
        readings: Arc<dyn SensorReadingRepository>,
        stations: Vec<Station>,
    ) -> Self {
        let stations = stations
            .into_iter()
            .map(|mut station| {
                station.activate();
                (station.id.clone(), station)
            })
            .collect();
        Self {
            observations,
            readings,
            stations: RwLock::new(stations),
        }
    }

    /// Store an observation and fan it out into per-channel readings.
    pub async fn ingest(&self, observation: WeatherObservation) -> Result<()> {
        let station_id = observation.station_id.clone();
        let readings = observation.to_readings();

        self.observations.save(observation).await?;
        for reading in readings {
            self.readings.save(reading).await?;
        }

        info!(station = %station_id, "observation stored");
        Ok(())
    }

    pub async fn start_sensor(&self, sensor_id: &str) {
        let mut stations = self.stations.write().await;
        match stations.get_mut(sensor_id) {
            Some(station) => {
                station.activate();
                info!(sensor = sensor_id, "sensor started");
            }
            None => warn!(sensor = sensor_id, "unknown sensor"),
        }
    }

    pub async fn stop_sensor(&self, sensor_id: &str) {
        let mut stations = self.stations.write().await;
        match stations.get_mut(sensor_id) {
            Some(station) => {
                station.deactivate();
                info!(sensor = sensor_id, "sensor stopped");
            }
            None => warn!(sensor = sensor_id, "unknown sensor"),
        }
    }

    /// Readings for a station over the recent history window, reconstructed
    /// from the stored observations.
    pub async fn sensor_readings(
        &self,
        sensor_id: &str,
        hours: i64,
    ) -> Result<Vec<SensorReading>> {
        let history = self.observations.station_history(sensor_id, hours).await?;
        Ok(history
            .iter()
            .flat_map(WeatherObservation::to_readings)
            .collect())
    }

    pub async fn sensor_status(&self, sensor_id: &str) -> Result<SensorStatus> {
        let is_active = self
            .stations
            .read()
            .await
            .get(sensor_id)
            .is_some_and(Station::is_active);
        let latest = self.observations.latest_for_station(sensor_id).await?;

        Ok(SensorStatus {
            sensor_id: sensor_id.to_string(),
            is_active,
            last_update: latest.as_ref().map(|observation| observation.observed_at),
            data_available: latest.is_some(),
        })
    }

    pub async fn all_sensor_status(&self) -> Result<Vec<SensorStatus>> {
        let sensor_ids: Vec<String> = self.stations.read().await.keys().cloned().collect();

        let mut statuses = Vec::with_capacity(sensor_ids.len());
        for sensor_id in sensor_ids {
            statuses.push(self.sensor_status(&sensor_id).await?);
        }
        Ok(statuses)
    }
}
