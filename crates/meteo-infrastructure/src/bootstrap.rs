//! Composition root
//!
//! Builds the [`AppContext`] once at startup: one component registry, one
//! registration pass over every repository, service, and controller, and
//! typed accessors that resolve through the registry afterwards. There is
//! no ambient global state; whoever needs the context receives it by
//! reference or clone of its `Arc`s.
//!
//! ## Architecture
//!
//! ```text
//! AppConfig ──► init_app
//!                  │ register_components
//!                  ▼
//!          ComponentRegistry
//!          clock ◄─ repositories ◄─ services ◄─ controllers
//!                  │
//!                  ▼
//!              AppContext ── typed accessors (resolve on demand)
//! ```

use std::sync::Arc;

use tracing::info;

use meteo_application::controllers::{
    AlertsController, DataController, ForecastController, IngestionController,
};
use meteo_application::services::{AlertService, ForecastService};
use meteo_domain::entities::Station;
use meteo_domain::error::{Error, Result};
use meteo_domain::ports::{
    AlertRepository, Clock, ForecastRepository, ObservationRepository, SensorReadingRepository,
    SystemClock,
};
use meteo_domain::value_objects::GeoPoint;
use meteo_registry::{ComponentRegistry, Lifecycle};
use meteo_storage::{
    InMemoryAlertRepository, InMemoryForecastRepository, InMemoryObservationRepository,
    InMemorySensorReadingRepository,
};

use crate::config::AppConfig;

/// Application context handed to the runtime loop.
///
/// Owns the configuration and the registry; everything else is resolved
/// through the registry on demand, so controllers observe exactly the
/// wiring recorded at bootstrap.
pub struct AppContext {
    config: Arc<AppConfig>,
    registry: Arc<ComponentRegistry>,
}

impl AppContext {
    pub fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }

    pub fn registry(&self) -> Arc<ComponentRegistry> {
        self.registry.clone()
    }

    pub fn clock(&self) -> Result<Arc<dyn Clock>> {
        self.resolve::<dyn Clock>()
    }

    pub fn sensor_readings(&self) -> Result<Arc<dyn SensorReadingRepository>> {
        self.resolve::<dyn SensorReadingRepository>()
    }

    pub fn forecasts(&self) -> Result<Arc<dyn ForecastRepository>> {
        self.resolve::<dyn ForecastRepository>()
    }

    pub fn alerts(&self) -> Result<Arc<dyn AlertRepository>> {
        self.resolve::<dyn AlertRepository>()
    }

    pub fn observations(&self) -> Result<Arc<dyn ObservationRepository>> {
        self.resolve::<dyn ObservationRepository>()
    }

    pub fn forecast_service(&self) -> Result<Arc<ForecastService>> {
        self.resolve::<ForecastService>()
    }

    pub fn alert_service(&self) -> Result<Arc<AlertService>> {
        self.resolve::<AlertService>()
    }

    pub fn data_controller(&self) -> Result<Arc<DataController>> {
        self.resolve::<DataController>()
    }

    pub fn ingestion_controller(&self) -> Result<Arc<IngestionController>> {
        self.resolve::<IngestionController>()
    }

    pub fn forecast_controller(&self) -> Result<Arc<ForecastController>> {
        self.resolve::<ForecastController>()
    }

    pub fn alerts_controller(&self) -> Result<Arc<AlertsController>> {
        self.resolve::<AlertsController>()
    }

    fn resolve<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.registry
            .resolve::<T>()
            .map_err(|error| Error::wiring(error.to_string()))
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Initialize the application context.
///
/// Registers every component once, before anything is served. Registry
/// failures after this point are wiring bugs and surface as
/// [`Error::Wiring`] from the accessors.
pub fn init_app(config: AppConfig) -> Result<AppContext> {
    info!("initializing application context");

    let config = Arc::new(config);
    let registry = Arc::new(ComponentRegistry::new());

    register_components(&registry, &config);
    info!(
        components = registry.registered_type_names().len(),
        "components registered"
    );

    Ok(AppContext { config, registry })
}

/// Initialize a context with default configuration, for tests.
pub fn init_test_app() -> Result<AppContext> {
    init_app(AppConfig::default())
}

fn register_components(registry: &ComponentRegistry, config: &Arc<AppConfig>) {
    registry.register_instance::<AppConfig>(config.clone());

    registry.register::<dyn Clock, _>(Lifecycle::Singleton, |_| Ok(Arc::new(SystemClock)));

    // Repositories
    registry.register::<dyn SensorReadingRepository, _>(Lifecycle::Singleton, |_| {
        Ok(Arc::new(InMemorySensorReadingRepository::new()))
    });
    registry.register::<dyn ForecastRepository, _>(Lifecycle::Singleton, |r| {
        Ok(Arc::new(InMemoryForecastRepository::new(
            r.dependency::<dyn Clock>("clock")?,
        )))
    });
    registry.register::<dyn AlertRepository, _>(Lifecycle::Singleton, |_| {
        Ok(Arc::new(InMemoryAlertRepository::new()))
    });
    registry.register::<dyn ObservationRepository, _>(Lifecycle::Singleton, |r| {
        Ok(Arc::new(InMemoryObservationRepository::new(
            r.dependency::<dyn Clock>("clock")?,
        )))
    });

    // Services
    registry.register::<ForecastService, _>(Lifecycle::Singleton, |r| {
        Ok(Arc::new(ForecastService::new(
            r.dependency::<dyn Clock>("clock")?,
        )))
    });
    registry.register::<AlertService, _>(Lifecycle::Singleton, |r| {
        let config = r.dependency::<AppConfig>("config")?;
        Ok(Arc::new(AlertService::new(
            r.dependency::<dyn ObservationRepository>("observations")?,
            r.dependency::<dyn AlertRepository>("alerts")?,
            config.alerts.thresholds,
            r.dependency::<dyn Clock>("clock")?,
        )))
    });

    // Controllers
    registry.register::<DataController, _>(Lifecycle::Singleton, |r| {
        let config = r.dependency::<AppConfig>("config")?;
        let stations = config
            .stations
            .locations
            .iter()
            .map(|(id, location)| {
                Station::new(
                    id.clone(),
                    location.name.clone(),
                    GeoPoint::new(location.lat, location.lon),
                )
            })
            .collect();
        Ok(Arc::new(DataController::new(
            r.dependency::<dyn ObservationRepository>("observations")?,
            r.dependency::<dyn SensorReadingRepository>("readings")?,
            stations,
        )))
    });
    registry.register::<IngestionController, _>(Lifecycle::Singleton, |r| {
        let config = r.dependency::<AppConfig>("config")?;
        Ok(Arc::new(IngestionController::new(
            r.dependency::<dyn SensorReadingRepository>("readings")?,
            r.dependency::<dyn Clock>("clock")?,
            config.ingestion.sources.clone(),
        )))
    });
    registry.register::<ForecastController, _>(Lifecycle::Singleton, |r| {
        Ok(Arc::new(ForecastController::new(
            r.dependency::<ForecastService>("service")?,
            r.dependency::<dyn ForecastRepository>("forecasts")?,
        )))
    });
    registry.register::<AlertsController, _>(Lifecycle::Singleton, |r| {
        Ok(Arc::new(AlertsController::new(
            r.dependency::<AlertService>("service")?,
            r.dependency::<dyn AlertRepository>("alerts")?,
            r.dependency::<dyn Clock>("clock")?,
        )))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_resolves_every_component() {
        let context = init_test_app().unwrap();

        context.clock().unwrap();
        context.sensor_readings().unwrap();
        context.forecasts().unwrap();
        context.alerts().unwrap();
        context.observations().unwrap();
        context.forecast_service().unwrap();
        context.alert_service().unwrap();
        context.data_controller().unwrap();
        context.ingestion_controller().unwrap();
        context.forecast_controller().unwrap();
        context.alerts_controller().unwrap();
    }

    #[test]
    fn repositories_are_singletons() {
        let context = init_test_app().unwrap();

        let first = context.sensor_readings().unwrap();
        let second = context.sensor_readings().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn controllers_share_the_repository_instances() {
        let context = init_test_app().unwrap();

        // Resolving the controller graph must not construct fresh stores:
        // the singleton repository is the one the controllers hold.
        context.data_controller().unwrap();
        let repo = context.sensor_readings().unwrap();
        let again = context.sensor_readings().unwrap();
        assert!(Arc::ptr_eq(&repo, &again));
    }

    #[test]
    fn config_instance_is_shared() {
        let context = init_test_app().unwrap();
        let config = context.config();

        let resolved = context.registry().resolve::<AppConfig>().unwrap();
        assert!(Arc::ptr_eq(&config, &resolved));
    }
}
