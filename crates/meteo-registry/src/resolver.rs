//! Per-resolution handle with cycle detection

use std::any::{TypeId, type_name};
use std::cell::RefCell;
use std::sync::Arc;

use crate::binding::{Lifecycle, Provider};
use crate::error::RegistryError;
use crate::registry::{ComponentRegistry, downcast};

/// Handle passed to factory closures during resolution.
///
/// Carries the registry reference and the stack of types currently being
/// constructed. The stack is what turns an unbounded recursion on a cyclic
/// binding graph into an immediate [`RegistryError::CyclicDependency`]: a
/// type encountered while already on the stack fails fast with the full
/// chain instead of recursing.
pub struct Resolver<'a> {
    registry: &'a ComponentRegistry,
    in_progress: RefCell<Vec<Frame>>,
}

struct Frame {
    id: TypeId,
    type_name: &'static str,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(registry: &'a ComponentRegistry) -> Self {
        Self {
            registry,
            in_progress: RefCell::new(Vec::new()),
        }
    }

    /// Resolve an instance of `T`.
    ///
    /// Resolution order: singleton cache, then the recorded binding. An
    /// instance binding is cached on first hit; a factory binding runs with
    /// this resolver (re-entrantly for its dependencies) and its product is
    /// cached when the lifecycle is [`Lifecycle::Singleton`].
    pub fn resolve<T>(&self) -> Result<Arc<T>, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = TypeId::of::<T>();

        if let Some(cached) = self.registry.cached(key) {
            return downcast::<T>(&cached);
        }

        let Some(binding) = self.registry.binding(key) else {
            return Err(RegistryError::Unregistered {
                type_name: type_name::<T>(),
            });
        };

        match binding.provider {
            Provider::Instance(value) => {
                let canonical = self.registry.cache_singleton(key, value);
                downcast::<T>(&canonical)
            }
            Provider::Factory(factory) => {
                if self.is_in_progress(key) {
                    return Err(self.cycle_error(binding.type_name));
                }

                self.in_progress.borrow_mut().push(Frame {
                    id: key,
                    type_name: binding.type_name,
                });
                let produced = factory(self);
                self.in_progress.borrow_mut().pop();

                let value = produced?;
                if binding.lifecycle == Lifecycle::Singleton {
                    let canonical = self.registry.cache_singleton(key, value);
                    return downcast::<T>(&canonical);
                }
                downcast::<T>(&value)
            }
        }
    }

    /// Resolve a dependency on behalf of the factory currently running.
    ///
    /// Identical to [`Resolver::resolve`], except that a missing binding is
    /// reported as [`RegistryError::UnresolvedDependency`] naming the
    /// dependency type, the constructor parameter, and the owning type, so
    /// wiring errors point at the registration that needs fixing.
    pub fn dependency<T>(&self, parameter: &'static str) -> Result<Arc<T>, RegistryError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let owner = self
            .in_progress
            .borrow()
            .last()
            .map_or("<root>", |frame| frame.type_name);

        self.resolve::<T>().map_err(|error| match error {
            RegistryError::Unregistered { type_name } => RegistryError::UnresolvedDependency {
                dependency: type_name,
                parameter,
                owner,
            },
            other => other,
        })
    }

    fn is_in_progress(&self, key: TypeId) -> bool {
        self.in_progress
            .borrow()
            .iter()
            .any(|frame| frame.id == key)
    }

    fn cycle_error(&self, repeated: &'static str) -> RegistryError {
        let mut chain: Vec<&'static str> = self
            .in_progress
            .borrow()
            .iter()
            .map(|frame| frame.type_name)
            .collect();
        chain.push(repeated);
        RegistryError::CyclicDependency { chain }
    }
}
