//! Resolver traits for service resolution.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::ServiceIdentifier;
use crate::service_type::{AnyArc, Injectable};
use crate::token::Token;

/// Object-safe resolution over type-erased values.
///
/// Most callers want [`Resolver`], which adds typed helpers on top.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single value, producing and caching it as needed.
    fn resolve_any(&self, id: &ServiceIdentifier) -> DiResult<AnyArc>;

    /// Resolves every grouped value under `id`, in registration order.
    ///
    /// Fails with `ServiceNotFound` when nothing is grouped under `id`.
    fn resolve_many(&self, id: &ServiceIdentifier) -> DiResult<Vec<AnyArc>>;

    /// True if a single-value record exists for `id`.
    fn contains(&self, id: &ServiceIdentifier) -> bool;
}

fn downcast<T: Any + Send + Sync>(value: AnyArc) -> DiResult<Arc<T>> {
    value
        .downcast::<T>()
        .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
}

fn downcast_trait<T: ?Sized + Send + Sync + 'static>(value: AnyArc) -> DiResult<Arc<T>> {
    value
        .downcast::<Arc<T>>()
        .map(|inner| (*inner).clone())
        .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
}

/// Typed resolution helpers.
///
/// Both [`Container`](crate::Container) and [`Scope`](crate::Scope)
/// implement this trait.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Container, Resolver, Token};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// let port = Token::<u16>::named("port");
/// let container = Container::new();
/// container
///     .set_value(&port, 8080u16)
///     .set_value("greeter", Arc::new(English) as Arc<dyn Greeter>);
///
/// assert_eq!(*container.get_token(&port).unwrap(), 8080);
/// assert_eq!(container.get_trait::<dyn Greeter>("greeter").unwrap().greet(), "hello");
/// assert!(container.get::<String>("greeter").is_err());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves `id` and downcasts the value to `T`.
    fn get<T: Any + Send + Sync>(&self, id: impl Into<ServiceIdentifier>) -> DiResult<Arc<T>> {
        downcast(self.resolve_any(&id.into())?)
    }

    /// Resolves the service registered for (or synthesized from) type `T`.
    fn get_type<T: Injectable>(&self) -> DiResult<Arc<T>> {
        self.get::<T>(ServiceIdentifier::of::<T>())
    }

    /// Resolves a token to its declared value type.
    fn get_token<T: Any + Send + Sync>(&self, token: &Token<T>) -> DiResult<Arc<T>> {
        self.get::<T>(token)
    }

    /// Resolves every grouped value under `id` as `T`.
    fn get_many<T: Any + Send + Sync>(&self, id: impl Into<ServiceIdentifier>) -> DiResult<Vec<Arc<T>>> {
        self.resolve_many(&id.into())?.into_iter().map(downcast::<T>).collect()
    }

    /// Resolves a trait object stored as `Arc<dyn Trait>`.
    fn get_trait<T: ?Sized + Send + Sync + 'static>(&self, id: impl Into<ServiceIdentifier>) -> DiResult<Arc<T>> {
        downcast_trait::<T>(self.resolve_any(&id.into())?)
    }

    /// Resolves every grouped trait object stored as `Arc<dyn Trait>`.
    fn get_many_trait<T: ?Sized + Send + Sync + 'static>(
        &self,
        id: impl Into<ServiceIdentifier>,
    ) -> DiResult<Vec<Arc<T>>> {
        self.resolve_many(&id.into())?.into_iter().map(downcast_trait::<T>).collect()
    }

    /// True if a single-value record exists for `id`.
    fn has(&self, id: impl Into<ServiceIdentifier>) -> bool {
        self.contains(&id.into())
    }
}

impl Resolver for crate::container::Scope {}
impl Resolver for crate::container::Container {}
