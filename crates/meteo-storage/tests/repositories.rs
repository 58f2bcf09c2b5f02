//! Repository behaviour tests
//!
//! Exercises the indexed stores through their port traits: idempotent
//! upserts, inclusive range scans, query-time freshness, index repair on
//! key-changing overwrites, and the two independent alert activity signals.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use meteo_domain::entities::{Alert, Forecast, ForecastPoint, SensorReading, WeatherObservation};
use meteo_domain::ports::{
    AlertRepository, Clock, ForecastRepository, ObservationRepository, SensorReadingRepository,
};
use meteo_domain::value_objects::{AlertLevel, MeasurementKind, TimestampMs};
use meteo_storage::{
    InMemoryAlertRepository, InMemoryForecastRepository, InMemoryObservationRepository,
    InMemorySensorReadingRepository,
};

/// Clock pinned to a single instant, for freshness-window tests.
struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn at_ms(ms: TimestampMs) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).expect("timestamp in range")
}

fn reading(id: &str, measured_at: TimestampMs, value: f64) -> SensorReading {
    SensorReading::new(id, measured_at, value, MeasurementKind::Temperature)
}

fn forecast(id: &str, region: &str, calculated: DateTime<Utc>) -> Forecast {
    Forecast {
        id: id.to_string(),
        model_type: "WRF-ARW".to_string(),
        calculation_time: calculated,
        valid_from: calculated,
        valid_to: calculated + TimeDelta::hours(72),
        region: region.to_string(),
        points: vec![ForecastPoint {
            time: "00:00".to_string(),
            temperature: 15.0,
            humidity: 60.0,
            wind_speed: 5.0,
        }],
    }
}

fn alert(id: &str, from: DateTime<Utc>, to: DateTime<Utc>, is_active: bool) -> Alert {
    Alert {
        id: id.to_string(),
        level: AlertLevel::Warning,
        kind: "Heavy precipitation".to_string(),
        region: "Minsk".to_string(),
        valid_from: from,
        valid_to: to,
        description: "Rainfall above 50 mm/h".to_string(),
        is_active,
    }
}

fn observation(id: &str, station: &str, observed_at: DateTime<Utc>) -> WeatherObservation {
    WeatherObservation {
        id: id.to_string(),
        station_id: station.to_string(),
        observed_at,
        temperature: 18.0,
        humidity: 55.0,
        pressure: 745.0,
        wind_speed: 4.0,
        wind_direction: "W".to_string(),
        precipitation: 0.0,
        phenomena: String::new(),
    }
}

// ============================================================================
// Sensor readings - time-bucket index
// ============================================================================

#[tokio::test]
async fn upsert_is_idempotent() {
    let repo = InMemorySensorReadingRepository::new();
    let sample = reading("r1", 100, 21.5);

    repo.save(sample.clone()).await.unwrap();
    repo.save(sample.clone()).await.unwrap();

    assert_eq!(repo.get_all().await.unwrap().len(), 1);
    assert_eq!(repo.get_by_id("r1").await.unwrap(), Some(sample));
}

#[tokio::test]
async fn between_is_inclusive_and_ascending() {
    let repo = InMemorySensorReadingRepository::new();
    repo.save(reading("r1", 100, 1.0)).await.unwrap();
    repo.save(reading("r2", 200, 2.0)).await.unwrap();
    repo.save(reading("r3", 300, 3.0)).await.unwrap();

    let hits = repo.between(150, 300).await.unwrap();

    let ids: Vec<&str> = hits.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r2", "r3"]);
    assert!(hits.windows(2).all(|w| w[0].measured_at <= w[1].measured_at));
}

#[tokio::test]
async fn between_with_empty_window_returns_nothing() {
    let repo = InMemorySensorReadingRepository::new();
    repo.save(reading("r1", 100, 1.0)).await.unwrap();

    assert!(repo.between(300, 200).await.unwrap().is_empty());
    assert!(repo.between(101, 150).await.unwrap().is_empty());
}

#[tokio::test]
async fn overwrite_with_new_timestamp_moves_time_bucket() {
    let repo = InMemorySensorReadingRepository::new();
    repo.save(reading("r1", 100, 1.0)).await.unwrap();
    repo.save(reading("r1", 500, 1.0)).await.unwrap();

    assert!(repo.between(50, 150).await.unwrap().is_empty());
    let hits = repo.between(450, 550).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "r1");
    assert_eq!(repo.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn by_kind_filters_measurements() {
    let repo = InMemorySensorReadingRepository::new();
    repo.save(reading("t1", 100, 20.0)).await.unwrap();
    repo.save(SensorReading::new("h1", 100, 60.0, MeasurementKind::Humidity))
        .await
        .unwrap();

    let temps = repo.by_kind(MeasurementKind::Temperature).await.unwrap();
    assert_eq!(temps.len(), 1);
    assert_eq!(temps[0].id, "t1");
}

// ============================================================================
// Forecasts - region index, digest twin, freshness window
// ============================================================================

#[tokio::test]
async fn current_for_region_applies_freshness_window_at_query_time() {
    let created = at_ms(1_700_000_000_000);

    let fresh_clock = Arc::new(FixedClock(created + TimeDelta::hours(23)));
    let repo = InMemoryForecastRepository::new(fresh_clock);
    repo.save(forecast("fc-1", "Minsk", created)).await.unwrap();

    let current = repo.current_for_region("Minsk").await.unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].forecast_id, "fc-1");

    // Same store contents, later clock: the digest silently expires.
    let stale_clock = Arc::new(FixedClock(created + TimeDelta::hours(25)));
    let repo = InMemoryForecastRepository::new(stale_clock);
    repo.save(forecast("fc-1", "Minsk", created)).await.unwrap();

    assert!(repo.current_for_region("Minsk").await.unwrap().is_empty());
    // The forecast itself is still indexed and retrievable.
    assert_eq!(repo.all_for_region("Minsk").await.unwrap().len(), 1);
}

#[tokio::test]
async fn region_reassignment_repairs_the_index() {
    let now = at_ms(1_700_000_000_000);
    let repo = InMemoryForecastRepository::new(Arc::new(FixedClock(now)));

    repo.save(forecast("fc-1", "Minsk", now)).await.unwrap();
    let mut moved = forecast("fc-1", "Brest", now);
    moved.points[0].temperature = 12.0;
    repo.save(moved).await.unwrap();

    assert!(repo.all_for_region("Minsk").await.unwrap().is_empty());
    assert!(repo.current_for_region("Minsk").await.unwrap().is_empty());

    let brest = repo.all_for_region("Brest").await.unwrap();
    assert_eq!(brest.len(), 1);
    assert_eq!(brest[0].id, "fc-1");
    assert_eq!(repo.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn digest_twin_tracks_the_canonical_forecast() {
    let now = at_ms(1_700_000_000_000);
    let repo = InMemoryForecastRepository::new(Arc::new(FixedClock(now)));

    repo.save(forecast("fc-1", "Minsk", now)).await.unwrap();
    let mut updated = forecast("fc-1", "Minsk", now);
    updated.points[0].temperature = -3.0;
    updated.points[0].humidity = 90.0;
    repo.save(updated).await.unwrap();

    let current = repo.current_for_region("Minsk").await.unwrap();
    assert_eq!(current.len(), 1);
    assert!((current[0].temperature - (-3.0)).abs() < f64::EPSILON);
    assert_eq!(current[0].precipitation_chance, 90);
}

#[tokio::test]
async fn latest_for_region_picks_newest_calculation() {
    let base = at_ms(1_700_000_000_000);
    let repo = InMemoryForecastRepository::new(Arc::new(FixedClock(base)));

    repo.save(forecast("fc-old", "Minsk", base - TimeDelta::hours(2)))
        .await
        .unwrap();
    repo.save(forecast("fc-new", "Minsk", base)).await.unwrap();

    let latest = repo.latest_for_region("Minsk").await.unwrap().unwrap();
    assert_eq!(latest.id, "fc-new");
    assert!(repo.latest_for_region("Grodno").await.unwrap().is_none());
}

// ============================================================================
// Alerts - two independent activity signals
// ============================================================================

#[tokio::test]
async fn notice_activity_ignores_the_is_active_flag() {
    let from = at_ms(1_700_000_000_000);
    let to = from + TimeDelta::hours(6);
    let repo = InMemoryAlertRepository::new();

    // Deactivated alert, window still open.
    repo.save(alert("al-1", from, to, false)).await.unwrap();

    let inside = from.timestamp_millis() + 1_000;
    let notices = repo.active_notices(inside).await.unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].id, "al-1");

    // The flag-based query disagrees, by design of the two signals.
    assert!(repo.active_alerts(at_ms(inside)).await.unwrap().is_empty());
}

#[tokio::test]
async fn alert_activity_requires_flag_and_window() {
    let from = at_ms(1_700_000_000_000);
    let to = from + TimeDelta::hours(6);
    let repo = InMemoryAlertRepository::new();
    repo.save(alert("al-1", from, to, true)).await.unwrap();

    let inside = from + TimeDelta::hours(1);
    let active = repo.active_alerts(inside).await.unwrap();
    assert_eq!(active.len(), 1);

    let after = to + TimeDelta::hours(1);
    assert!(repo.active_alerts(after).await.unwrap().is_empty());
    assert!(
        repo.active_notices(after.timestamp_millis())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn notice_twin_is_recomputed_on_overwrite() {
    let from = at_ms(1_700_000_000_000);
    let to = from + TimeDelta::hours(6);
    let repo = InMemoryAlertRepository::new();

    repo.save(alert("al-1", from, to, true)).await.unwrap();
    // Shrink the window; the twin must follow.
    repo.save(alert("al-1", from, from + TimeDelta::hours(1), true))
        .await
        .unwrap();

    let late = (from + TimeDelta::hours(2)).timestamp_millis();
    assert!(repo.active_notices(late).await.unwrap().is_empty());
}

// ============================================================================
// Observations - station index
// ============================================================================

#[tokio::test]
async fn latest_for_station_picks_newest_observation() {
    let now = at_ms(1_700_000_000_000);
    let repo = InMemoryObservationRepository::new(Arc::new(FixedClock(now)));

    repo.save(observation("obs-1", "26850", now - TimeDelta::hours(3)))
        .await
        .unwrap();
    repo.save(observation("obs-2", "26850", now - TimeDelta::hours(1)))
        .await
        .unwrap();
    repo.save(observation("obs-3", "26851", now)).await.unwrap();

    let latest = repo.latest_for_station("26850").await.unwrap().unwrap();
    assert_eq!(latest.id, "obs-2");
    assert!(repo.latest_for_station("99999").await.unwrap().is_none());
}

#[tokio::test]
async fn station_history_respects_the_window() {
    let now = at_ms(1_700_000_000_000);
    let repo = InMemoryObservationRepository::new(Arc::new(FixedClock(now)));

    repo.save(observation("obs-old", "26850", now - TimeDelta::hours(30)))
        .await
        .unwrap();
    repo.save(observation("obs-new", "26850", now - TimeDelta::hours(2)))
        .await
        .unwrap();

    let history = repo.station_history("26850", 24).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, "obs-new");
}
