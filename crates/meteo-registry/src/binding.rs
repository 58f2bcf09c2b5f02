//! Binding records held by the registry

use std::any::Any;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::resolver::Resolver;

/// Type-erased shared value stored by the registry.
///
/// The concrete payload is always an `Arc<T>` for the `T` the binding was
/// registered under, which is what makes `dyn Trait` keys representable:
/// the `Arc<T>` itself is the sized value boxed behind `dyn Any`.
pub type SharedAny = Arc<dyn Any + Send + Sync>;

/// Type-erased factory invoked during resolution.
pub(crate) type FactoryFn =
    dyn Fn(&Resolver<'_>) -> Result<SharedAny, RegistryError> + Send + Sync;

/// Instance lifecycle attached to a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// One cached instance for the process; constructed on first resolution.
    Singleton,
    /// A fresh instance per resolution; never cached.
    Transient,
}

/// How a binding produces its value.
#[derive(Clone)]
pub(crate) enum Provider {
    /// An already-built instance registered directly.
    Instance(SharedAny),
    /// A factory closure that wires the instance on demand.
    Factory(Arc<FactoryFn>),
}

/// A registered association between a type key and its provider.
#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) provider: Provider,
    pub(crate) lifecycle: Lifecycle,
    /// Human-readable name of the key type, kept for diagnostics.
    pub(crate) type_name: &'static str,
}
