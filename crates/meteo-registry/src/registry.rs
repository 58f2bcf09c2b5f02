//! The component registry container

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::binding::{Binding, Lifecycle, Provider, SharedAny};
use crate::error::RegistryError;
use crate::resolver::Resolver;

/// Container for type-keyed bindings and cached singleton instances.
///
/// Bindings are recorded once during bootstrap and read on every resolution,
/// so both maps sit behind read/write locks and the hot path takes shared
/// locks only. Bindings are cloned out of the lock before a factory runs,
/// which keeps re-entrant resolution (and registration from inside a
/// factory) deadlock-free.
///
/// The singleton cache is populated lazily on first resolution and never
/// invalidated for the lifetime of the process; re-registering a key
/// replaces the binding but leaves an already-cached instance in place.
pub struct ComponentRegistry {
    bindings: RwLock<HashMap<TypeId, Binding>>,
    singletons: RwLock<HashMap<TypeId, SharedAny>>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
            singletons: RwLock::new(HashMap::new()),
        }
    }

    /// Record a factory binding for `T` under the given lifecycle.
    ///
    /// The factory receives a [`Resolver`] and pulls its dependencies through
    /// [`Resolver::dependency`]. Registering the same key again overwrites
    /// the prior binding; last write wins and no error is raised.
    pub fn register<T, F>(&self, lifecycle: Lifecycle, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<Arc<T>, RegistryError> + Send + Sync + 'static,
    {
        let wrapped = Arc::new(move |resolver: &Resolver<'_>| {
            let built = factory(resolver)?;
            Ok(Arc::new(built) as SharedAny)
        });
        self.install(
            TypeId::of::<T>(),
            Binding {
                provider: Provider::Factory(wrapped),
                lifecycle,
                type_name: type_name::<T>(),
            },
        );
    }

    /// Record an already-built instance for `T`.
    ///
    /// Instance bindings behave as singletons: the value is cached on first
    /// resolution and every caller receives the same `Arc`.
    pub fn register_instance<T>(&self, instance: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.install(
            TypeId::of::<T>(),
            Binding {
                provider: Provider::Instance(Arc::new(instance)),
                lifecycle: Lifecycle::Singleton,
                type_name: type_name::<T>(),
            },
        );
    }

    /// Resolve an instance of `T` from the registry.
    ///
    /// Starts a fresh resolution with an empty in-progress stack; factories
    /// invoked along the way share that stack for cycle detection.
    pub fn resolve<T>(&self) -> Result<Arc<T>, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Resolver::new(self).resolve::<T>()
    }

    /// Whether a binding exists for `T`.
    pub fn contains<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    /// Names of every registered key type.
    pub fn registered_type_names(&self) -> Vec<&'static str> {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|binding| binding.type_name)
            .collect()
    }

    /// Drop every binding and cached instance.
    pub fn clear(&self) {
        self.bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.singletons
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn install(&self, key: TypeId, binding: Binding) {
        debug!(component = binding.type_name, lifecycle = ?binding.lifecycle, "registered binding");
        self.bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, binding);
    }

    pub(crate) fn binding(&self, key: TypeId) -> Option<Binding> {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    pub(crate) fn cached(&self, key: TypeId) -> Option<SharedAny> {
        self.singletons
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    /// Cache a singleton and return the canonical stored value.
    ///
    /// First insert wins: if two tasks race to construct the same singleton,
    /// both observe the instance that landed in the cache first, preserving
    /// singleton identity for every caller.
    pub(crate) fn cache_singleton(&self, key: TypeId, value: SharedAny) -> SharedAny {
        self.singletons
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(value)
            .clone()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bindings = self
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        let singletons = self
            .singletons
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("ComponentRegistry")
            .field("bindings", &bindings)
            .field("singletons", &singletons)
            .finish_non_exhaustive()
    }
}

/// Downcast a stored value back to the `Arc<T>` it was registered as.
pub(crate) fn downcast<T>(value: &SharedAny) -> Result<Arc<T>, RegistryError>
where
    T: ?Sized + Send + Sync + 'static,
{
    value
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or(RegistryError::TypeMismatch {
            type_name: type_name::<T>(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Settings {
        name: String,
    }

    #[test]
    fn register_instance_resolves_same_arc() {
        let registry = ComponentRegistry::new();
        let settings = Arc::new(Settings {
            name: "meteo".to_string(),
        });
        registry.register_instance::<Settings>(settings.clone());

        let first = registry.resolve::<Settings>().unwrap();
        let second = registry.resolve::<Settings>().unwrap();

        assert_eq!(first.name, "meteo");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &settings));
    }

    #[test]
    fn resolve_unregistered_fails_with_type_name() {
        let registry = ComponentRegistry::new();
        let error = registry.resolve::<Settings>().unwrap_err();

        match error {
            RegistryError::Unregistered { type_name } => {
                assert!(type_name.contains("Settings"));
            }
            other => panic!("expected Unregistered, got {other}"),
        }
    }

    #[test]
    fn re_register_overwrites_without_error() {
        let registry = ComponentRegistry::new();
        registry.register::<Settings, _>(Lifecycle::Transient, |_| {
            Ok(Arc::new(Settings {
                name: "first".to_string(),
            }))
        });
        registry.register::<Settings, _>(Lifecycle::Transient, |_| {
            Ok(Arc::new(Settings {
                name: "second".to_string(),
            }))
        });

        let resolved = registry.resolve::<Settings>().unwrap();
        assert_eq!(resolved.name, "second");
    }

    #[test]
    fn contains_and_type_names_reflect_registrations() {
        let registry = ComponentRegistry::new();
        assert!(!registry.contains::<Settings>());

        registry.register::<Settings, _>(Lifecycle::Singleton, |_| {
            Ok(Arc::new(Settings {
                name: "meteo".to_string(),
            }))
        });

        assert!(registry.contains::<Settings>());
        let names = registry.registered_type_names();
        assert_eq!(names.len(), 1);
        assert!(names[0].contains("Settings"));
    }

    #[test]
    fn clear_removes_bindings_and_cache() {
        let registry = ComponentRegistry::new();
        registry.register::<Settings, _>(Lifecycle::Singleton, |_| {
            Ok(Arc::new(Settings {
                name: "meteo".to_string(),
            }))
        });
        registry.resolve::<Settings>().unwrap();

        registry.clear();

        assert!(!registry.contains::<Settings>());
        assert!(registry.resolve::<Settings>().is_err());
    }
}
