//! Component registry for the meteo platform
//!
//! A runtime container that records type-keyed bindings and resolves object
//! graphs from them. Each binding is either an already-built instance or a
//! typed factory closure; factories receive a [`Resolver`] handle and pull
//! their own dependencies through it, so the wiring of a component is spelled
//! out next to its registration instead of being discovered by reflection.
//!
//! ## Architecture
//!
//! ```text
//! register::<dyn ForecastRepository>(Singleton, factory)
//!         │
//!         ▼
//! ┌──────────────────────────────────────────────┐
//! │ ComponentRegistry                            │
//! │   bindings:   TypeId → Binding               │
//! │   singletons: TypeId → cached instance       │
//! └──────────────────────────────────────────────┘
//!         │ resolve::<T>()
//!         ▼
//! ┌──────────────────────────────────────────────┐
//! │ Resolver (per call)                          │
//! │   in-progress stack → cycle detection        │
//! │   dependency::<U>("param") → recursive wire  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use meteo_registry::{ComponentRegistry, Lifecycle};
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! let registry = ComponentRegistry::new();
//! registry.register::<dyn Greeter, _>(Lifecycle::Singleton, |_| Ok(Arc::new(English)));
//!
//! let greeter = registry.resolve::<dyn Greeter>().unwrap();
//! assert_eq!(greeter.greet(), "hello");
//! ```

mod binding;
mod error;
mod registry;
mod resolver;

pub use binding::{Lifecycle, SharedAny};
pub use error::RegistryError;
pub use registry::ComponentRegistry;
pub use resolver::Resolver;
