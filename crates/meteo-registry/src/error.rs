//! Registry error types

use thiserror::Error;

/// Errors raised while registering or resolving components.
///
/// Every variant names the offending type so a wiring mistake surfaces with
/// enough context to fix the registration, not just the fact that it failed.
/// These are configuration errors: they abort the resolution that triggered
/// them and are never retried.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// `resolve` was called for a key with no binding.
    #[error("type `{type_name}` is not registered in the component registry")]
    Unregistered {
        /// The requested key type.
        type_name: &'static str,
    },

    /// A factory could not resolve one of its dependencies.
    #[error("cannot resolve dependency `{dependency}` for parameter `{parameter}` of `{owner}`")]
    UnresolvedDependency {
        /// The dependency type that has no binding.
        dependency: &'static str,
        /// The constructor parameter being wired.
        parameter: &'static str,
        /// The type whose factory requested the dependency.
        owner: &'static str,
    },

    /// The resolution graph revisited a type already being constructed.
    #[error("cyclic dependency detected: {}", .chain.join(" -> "))]
    CyclicDependency {
        /// The chain of types in construction order, ending with the repeat.
        chain: Vec<&'static str>,
    },

    /// A stored value failed to downcast to the requested type.
    ///
    /// Unreachable through the typed `register`/`resolve` API, which keys
    /// values by the same type they are stored under; surfaced as an error
    /// rather than a panic all the same.
    #[error("registered value for `{type_name}` has an unexpected type")]
    TypeMismatch {
        /// The requested key type.
        type_name: &'static str,
    },
}
