//! Service records and factories.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::DiResult;
use crate::key::ServiceIdentifier;
use crate::lifetime::Lifetime;
use crate::service_type::{AnyArc, AnyBox, Args, Injectable, ServiceType};

type FactoryFn = dyn Fn(&Args<'_>) -> DiResult<AnyBox> + Send + Sync;

/// How a record produces its value when it has no explicit type to construct.
#[derive(Clone)]
pub enum Factory {
    /// Called with the resolved (non-placeholder) arguments and the scope
    Function(Arc<FactoryFn>),
    /// Resolve an instance of `owner`, then run its named method
    Method {
        owner: ServiceType,
        method: Cow<'static, str>,
    },
}

impl Factory {
    /// Wraps a closure returning a concrete value.
    pub fn function<T, F>(f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Args<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        Factory::Function(Arc::new(move |args: &Args<'_>| -> DiResult<AnyBox> {
            Ok(Box::new(f(args)?))
        }))
    }

    /// `(factory-type, method-name)` pair.
    pub fn method<F: Injectable>(method: impl Into<Cow<'static, str>>) -> Self {
        Factory::Method { owner: ServiceType::of::<F>(), method: method.into() }
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factory::Function(_) => f.write_str("Factory::Function(..)"),
            Factory::Method { owner, method } => write!(f, "Factory::Method({:?}, {:?})", owner, method),
        }
    }
}

/// Stored description of how to produce and cache a value.
///
/// Optional fields distinguish "not given" from "given": when a record is
/// set for an id that already holds one, only the given fields overwrite
/// the existing record.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Container, Factory, Resolver, ServiceMetadata, Token};
///
/// let plugins = Token::<&'static str>::named("plugins");
/// let container = Container::new();
/// container
///     .set(ServiceMetadata::for_id(&plugins).value("first").multiple())
///     .set(ServiceMetadata::for_id(&plugins).value("second").multiple())
///     .set(ServiceMetadata::for_id("greeting").factory(Factory::function(|_| Ok("hello"))));
///
/// let all = container.get_many::<&'static str>(&plugins).unwrap();
/// assert_eq!(all.iter().map(|v| **v).collect::<Vec<_>>(), vec!["first", "second"]);
/// assert_eq!(*container.get::<&'static str>("greeting").unwrap(), "hello");
/// ```
#[derive(Clone)]
pub struct ServiceMetadata {
    pub(crate) id: ServiceIdentifier,
    pub(crate) ty: Option<ServiceType>,
    pub(crate) factory: Option<Factory>,
    pub(crate) value: Option<AnyArc>,
    pub(crate) multiple: Option<bool>,
    pub(crate) global: Option<bool>,
    pub(crate) transient: Option<bool>,
}

impl ServiceMetadata {
    /// Record answering to `id`. The `{ service: token }` wrapper is unwrapped.
    pub fn for_id(id: impl Into<ServiceIdentifier>) -> Self {
        Self {
            id: id.into().normalized(),
            ty: None,
            factory: None,
            value: None,
            multiple: None,
            global: None,
            transient: None,
        }
    }

    /// Record for type `T`, answering to `T` itself.
    pub fn of_type<T: Injectable>() -> Self {
        Self::for_service_type(ServiceType::of::<T>())
    }

    /// Record for `ty`, answering to `ty` itself.
    pub fn for_service_type(ty: ServiceType) -> Self {
        let mut record = Self::for_id(ty);
        record.ty = Some(ty);
        record
    }

    /// Sets the concrete type to construct.
    pub fn with_type<T: Injectable>(mut self) -> Self {
        self.ty = Some(ServiceType::of::<T>());
        self
    }

    /// Sets the concrete type to construct from an erased handle.
    pub fn service_type(mut self, ty: ServiceType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn factory(mut self, factory: Factory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Pre-built value; the record never constructs anything.
    pub fn value<T: Any + Send + Sync>(self, value: T) -> Self {
        self.value_arc(Arc::new(value))
    }

    pub fn value_arc(mut self, value: AnyArc) -> Self {
        self.value = Some(value);
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = Some(true);
        self
    }

    pub fn global(mut self) -> Self {
        self.global = Some(true);
        self
    }

    pub fn transient(mut self) -> Self {
        self.transient = Some(true);
        self
    }

    /// Sets both lifecycle flags from a [`Lifetime`].
    pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
        self.global = Some(lifetime == Lifetime::Global);
        self.transient = Some(lifetime == Lifetime::Transient);
        self
    }

    pub fn id(&self) -> &ServiceIdentifier {
        &self.id
    }

    pub fn get_type(&self) -> Option<&ServiceType> {
        self.ty.as_ref()
    }

    pub fn get_factory(&self) -> Option<&Factory> {
        self.factory.as_ref()
    }

    pub fn cached_value(&self) -> Option<&AnyArc> {
        self.value.as_ref()
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple.unwrap_or(false)
    }

    pub fn is_global(&self) -> bool {
        self.global.unwrap_or(false)
    }

    pub fn is_transient(&self) -> bool {
        self.transient.unwrap_or(false)
    }

    pub fn get_lifetime(&self) -> Lifetime {
        Lifetime::from_flags(self.is_global(), self.is_transient())
    }

    /// Overwrites every field `other` carries; fields it leaves unset are kept.
    pub(crate) fn merge(&mut self, other: ServiceMetadata) {
        self.id = other.id;
        if other.ty.is_some() {
            self.ty = other.ty;
        }
        if other.factory.is_some() {
            self.factory = other.factory;
        }
        if other.value.is_some() {
            self.value = other.value;
        }
        if other.multiple.is_some() {
            self.multiple = other.multiple;
        }
        if other.global.is_some() {
            self.global = other.global;
        }
        if other.transient.is_some() {
            self.transient = other.transient;
        }
    }

    /// Copy of this record with the cached value cleared.
    pub(crate) fn without_value(&self) -> Self {
        let mut copy = self.clone();
        copy.value = None;
        copy
    }
}

impl fmt::Debug for ServiceMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceMetadata")
            .field("id", &self.id)
            .field("type", &self.ty)
            .field("factory", &self.factory)
            .field("cached", &self.value.is_some())
            .field("multiple", &self.is_multiple())
            .field("global", &self.is_global())
            .field("transient", &self.is_transient())
            .finish()
    }
}
