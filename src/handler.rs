//! Custom value providers for constructor parameters and properties.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::container::Scope;
use crate::error::DiResult;
use crate::key::{Key, ServiceIdentifier};
use crate::service_type::{AnyArc, Injectable};

type ProviderFn = dyn Fn(&Scope) -> DiResult<AnyArc> + Send + Sync;

/// What a handler supplies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerKind {
    /// Constructor parameter at this zero-based position
    Parameter(usize),
    /// Instance property with this name
    Property(String),
}

/// A registered value provider for one parameter or property of a target.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Args, Container, DiResult, Handler, Injectable, ParamType, Primitive, Resolver};
///
/// struct Extra {
///     lucky: u32,
/// }
///
/// impl Injectable for Extra {
///     fn construct(args: &Args<'_>) -> DiResult<Self> {
///         Ok(Extra { lucky: args.value::<u32>(0)?.unwrap_or(0) })
///     }
///
///     fn parameters() -> Vec<ParamType> {
///         vec![ParamType::Primitive(Primitive::Number)]
///     }
/// }
///
/// let container = Container::new();
/// container.register_handler(Handler::parameter_value::<Extra, _>(0, 777u32));
/// assert_eq!(container.get_type::<Extra>().unwrap().lucky, 777);
/// ```
#[derive(Clone)]
pub struct Handler {
    target: ServiceIdentifier,
    kind: HandlerKind,
    provider: Arc<ProviderFn>,
}

impl Handler {
    /// Handler supplying constructor parameter `index` of `target`.
    pub fn parameter<F>(target: impl Into<ServiceIdentifier>, index: usize, provider: F) -> Self
    where
        F: Fn(&Scope) -> DiResult<AnyArc> + Send + Sync + 'static,
    {
        Self { target: target.into(), kind: HandlerKind::Parameter(index), provider: Arc::new(provider) }
    }

    /// Handler supplying property `name` of `target`.
    pub fn property<F>(target: impl Into<ServiceIdentifier>, name: impl Into<String>, provider: F) -> Self
    where
        F: Fn(&Scope) -> DiResult<AnyArc> + Send + Sync + 'static,
    {
        Self { target: target.into(), kind: HandlerKind::Property(name.into()), provider: Arc::new(provider) }
    }

    /// Parameter handler for type `T` that always yields a clone of `value`.
    pub fn parameter_value<T, V>(index: usize, value: V) -> Self
    where
        T: Injectable,
        V: Clone + Send + Sync + 'static,
    {
        Self::parameter(ServiceIdentifier::of::<T>(), index, move |_| Ok(Arc::new(value.clone()) as AnyArc))
    }

    /// Property handler for type `T` that always yields a clone of `value`.
    pub fn property_value<T, V>(name: impl Into<String>, value: V) -> Self
    where
        T: Injectable,
        V: Clone + Send + Sync + 'static,
    {
        Self::property(ServiceIdentifier::of::<T>(), name, move |_| Ok(Arc::new(value.clone()) as AnyArc))
    }

    pub fn target(&self) -> &ServiceIdentifier {
        &self.target
    }

    pub fn kind(&self) -> &HandlerKind {
        &self.kind
    }

    /// Parameter position, for parameter handlers.
    pub fn index(&self) -> Option<usize> {
        match self.kind {
            HandlerKind::Parameter(index) => Some(index),
            HandlerKind::Property(_) => None,
        }
    }

    /// Property name, for property handlers.
    pub fn property_name(&self) -> Option<&str> {
        match &self.kind {
            HandlerKind::Property(name) => Some(name),
            HandlerKind::Parameter(_) => None,
        }
    }

    /// Runs the provider against the resolving scope.
    pub fn provide(&self, scope: &Scope) -> DiResult<AnyArc> {
        (self.provider)(scope)
    }

    /// Registry key this handler is filed under.
    ///
    /// Handlers declared on a type are filed under that type; names and
    /// tokens (wrapped or bare) are filed as the token or name itself.
    pub(crate) fn registry_key(&self) -> Key {
        self.target.key()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("target", &self.target)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Handlers grouped by target, in registration order.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
    handlers: RwLock<HashMap<Key, Vec<Handler>>>,
}

impl HandlerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, handler: Handler) {
        let key = handler.registry_key();
        self.handlers.write().entry(key).or_default().push(handler);
    }

    /// Copy of the handlers filed under `key`, so providers run without the lock held.
    pub(crate) fn for_key(&self, key: &Key) -> Vec<Handler> {
        self.handlers.read().get(key).cloned().unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.read().values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    #[test]
    fn handlers_keep_registration_order() {
        let registry = HandlerRegistry::new();
        registry.register(Handler::property("svc", "a", |_| Ok(Arc::new(1u8) as AnyArc)));
        registry.register(Handler::parameter("svc", 0, |_| Ok(Arc::new(2u8) as AnyArc)));

        let handlers = registry.for_key(&ServiceIdentifier::from("svc").key());
        assert_eq!(handlers.len(), 2);
        assert_eq!(handlers[0].property_name(), Some("a"));
        assert_eq!(handlers[1].index(), Some(0));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn wrapped_tokens_file_under_the_token() {
        let token = Token::<u8>::new();
        let registry = HandlerRegistry::new();
        registry.register(Handler::property(ServiceIdentifier::service(&token), "x", |_| {
            Ok(Arc::new(0u8) as AnyArc)
        }));

        assert_eq!(registry.for_key(&ServiceIdentifier::from(&token).key()).len(), 1);
    }

    #[test]
    fn unknown_target_has_no_handlers() {
        let registry = HandlerRegistry::new();
        assert!(registry.for_key(&ServiceIdentifier::from("none").key()).is_empty());
    }
}
