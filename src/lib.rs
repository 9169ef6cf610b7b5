//! # ferrous-registry
//!
//! Runtime service registry and dependency resolver: ask for a name, a type
//! or a token and get back a value, built on first request with its
//! dependencies wired in and cached per its lifecycle.
//!
//! ## Features
//!
//! - **Three identifier shapes**: string names, opaque [`Token`]s and [`Injectable`] types
//! - **Lifecycles**: per-scope singletons, transients and globals shared by every scope
//! - **Named scopes**: isolated caches created on demand with [`Container::of`]
//! - **Multi-binding**: several records under one identifier, resolved in order
//! - **Handlers**: custom providers for one constructor parameter or property
//! - **Pluggable reflection**: constructor parameter types come from a [`TypeReflector`]
//! - **Cycle detection**: re-entrant production fails with the full path
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_registry::{Args, Container, DiResult, Injectable, ParamType, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! impl Injectable for Database {
//!     fn construct(_args: &Args<'_>) -> DiResult<Self> {
//!         Ok(Database { url: "postgres://localhost".to_string() })
//!     }
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for UserService {
//!     fn construct(args: &Args<'_>) -> DiResult<Self> {
//!         Ok(UserService { db: args.required::<Database>(0)? })
//!     }
//!
//!     fn parameters() -> Vec<ParamType> {
//!         vec![ParamType::service::<Database>()]
//!     }
//! }
//!
//! let container = Container::new();
//! let users = container.get_type::<UserService>().unwrap();
//! assert_eq!(users.db.url, "postgres://localhost");
//!
//! // Singletons are cached
//! let db = container.get_type::<Database>().unwrap();
//! assert!(Arc::ptr_eq(&users.db, &db));
//! ```
//!
//! ## Global Services
//!
//! ```rust
//! use ferrous_registry::{Args, Container, DiResult, Injectable, Resolver, ServiceMetadata};
//! use std::sync::Arc;
//!
//! struct Settings;
//! impl Injectable for Settings {
//!     fn construct(_args: &Args<'_>) -> DiResult<Self> {
//!         Ok(Settings)
//!     }
//! }
//!
//! let container = Container::new();
//! container.set(ServiceMetadata::of_type::<Settings>().global());
//!
//! let a = container.of("tenant-a").get_type::<Settings>().unwrap();
//! let b = container.of("tenant-b").get_type::<Settings>().unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

// Module declarations
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod global;
pub mod handler;
pub mod inject;
pub mod key;
pub mod lifetime;
pub mod metadata;
pub mod observer;
pub mod reflection;
pub mod service_type;
pub mod token;
pub mod traits;

// Internal modules
mod internal;
mod registration;

pub use config::ContainerOptions;
pub use container::{Container, ContainerBuilder, Scope, ScopeId};
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use global::global;
pub use handler::{Handler, HandlerKind};
pub use inject::Inject;
pub use key::{Key, ServiceIdentifier};
pub use lifetime::Lifetime;
pub use metadata::{Factory, ServiceMetadata};
pub use observer::{LoggingObserver, RegistryObserver};
pub use reflection::{DeclaredParameters, ManifestReflector, NoReflection, ParamType, Primitive, TypeReflector};
pub use service_type::{AnyArc, AnyBox, Args, Injectable, ServiceType};
pub use token::{AnyToken, Token};
pub use traits::{Resolver, ResolverCore};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    static BUILT: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl Injectable for Counted {
        fn construct(_args: &Args<'_>) -> DiResult<Self> {
            BUILT.fetch_add(1, Ordering::SeqCst);
            Ok(Counted)
        }
    }

    #[test]
    fn cached_values_skip_construction() {
        let container = Container::new();
        let before = BUILT.load(Ordering::SeqCst);

        let a = container.get_type::<Counted>().unwrap();
        let b = container.get_type::<Counted>().unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(BUILT.load(Ordering::SeqCst), before + 1);
        assert!(container.has(ServiceIdentifier::of::<Counted>()));
    }

    #[test]
    fn set_value_on_type_keeps_the_type() {
        let container = Container::new();
        container.set_value(ServiceIdentifier::of::<Counted>(), Counted);

        let descriptor = container
            .descriptors()
            .into_iter()
            .find(|d| d.key == Key::of::<Counted>())
            .unwrap();
        assert!(descriptor.type_name.is_some());
        assert!(descriptor.cached);
    }

    #[test]
    fn scope_and_container_resolve_through_the_same_trait() {
        fn lookup<R: Resolver>(resolver: &R) -> u32 {
            *resolver.get::<u32>("n").unwrap()
        }

        let container = Container::new();
        container.set(ServiceMetadata::for_id("n").value(5u32).global());
        assert_eq!(lookup(&container), 5);
        assert_eq!(lookup(&container.default_scope()), 5);
        assert_eq!(lookup(&container.of("other")), 5);
    }
}
