//! The scope directory.
//!
//! A [`Container`] owns the default scope, the list of named scopes and the
//! handler registry shared by all of them. Every scope-less call is routed
//! to the default scope.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::ContainerOptions;
use crate::descriptors::ServiceDescriptor;
use crate::error::DiResult;
use crate::handler::{Handler, HandlerRegistry};
use crate::key::ServiceIdentifier;
use crate::metadata::ServiceMetadata;
use crate::observer::Observers;
use crate::reflection::TypeReflector;
use crate::registration::Registry;
use crate::service_type::AnyArc;
use crate::traits::ResolverCore;

mod builder;
mod scope;

pub use builder::ContainerBuilder;
pub use scope::Scope;

/// Identifier of a named scope.
///
/// Names and numbers compare by value, so `of("tenant-a")` returns the same
/// scope every time. [`ScopeId::unique`] hands out ids that never compare
/// equal to any other, for callers that want an identity-keyed scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeId {
    Named(Arc<str>),
    Number(u64),
    Unique(u64),
}

impl ScopeId {
    /// A fresh id distinct from every other id.
    pub fn unique() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ScopeId::Unique(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeId::Named(name) => f.write_str(name),
            ScopeId::Number(n) => write!(f, "#{}", n),
            ScopeId::Unique(n) => write!(f, "unique#{}", n),
        }
    }
}

impl From<&str> for ScopeId {
    fn from(name: &str) -> Self {
        ScopeId::Named(Arc::from(name))
    }
}

impl From<String> for ScopeId {
    fn from(name: String) -> Self {
        ScopeId::Named(Arc::from(name))
    }
}

impl From<u64> for ScopeId {
    fn from(n: u64) -> Self {
        ScopeId::Number(n)
    }
}

impl From<&ScopeId> for ScopeId {
    fn from(id: &ScopeId) -> Self {
        id.clone()
    }
}

/// State every scope of one container shares.
pub(crate) struct ContainerShared {
    pub(crate) default: Arc<Registry>,
    pub(crate) handlers: HandlerRegistry,
    pub(crate) reflector: Arc<dyn TypeReflector>,
    pub(crate) observers: Observers,
    pub(crate) options: ContainerOptions,
}

struct ContainerInner {
    shared: Arc<ContainerShared>,
    scopes: Mutex<Vec<Scope>>,
}

/// Service registry with a default scope and lazily created named scopes.
///
/// `Container` is cheap to clone; clones share every scope and handler.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Args, Container, DiResult, Injectable, Resolver};
/// use std::sync::Arc;
///
/// struct RequestLog;
/// impl Injectable for RequestLog {
///     fn construct(_args: &Args<'_>) -> DiResult<Self> {
///         Ok(RequestLog)
///     }
/// }
///
/// let container = Container::new();
///
/// let a = container.of("request-a").get_type::<RequestLog>().unwrap();
/// let b = container.of("request-b").get_type::<RequestLog>().unwrap();
/// assert!(!Arc::ptr_eq(&a, &b));
///
/// // Same id, same scope
/// let again = container.of("request-a").get_type::<RequestLog>().unwrap();
/// assert!(Arc::ptr_eq(&a, &again));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Container {
    /// Container with default options and the declared-parameter reflector.
    pub fn new() -> Self {
        ContainerBuilder::new().build()
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn from_shared(shared: ContainerShared) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                shared: Arc::new(shared),
                scopes: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.inner.shared.options
    }

    /// The default scope: source of global services and of the records
    /// named scopes inherit.
    pub fn default_scope(&self) -> Scope {
        Scope::new(None, self.inner.shared.default.clone(), self.inner.shared.clone())
    }

    /// Named scope for `id`, created on first reference.
    pub fn of(&self, id: impl Into<ScopeId>) -> Scope {
        let id = id.into();
        let mut scopes = self.inner.scopes.lock();
        if let Some(scope) = scopes.iter().find(|s| s.id() == Some(&id)) {
            return scope.clone();
        }

        tracing::debug!(scope = %id, "creating scope");
        let scope = Scope::new(Some(id), Arc::new(Registry::new()), self.inner.shared.clone());
        scopes.push(scope.clone());
        scope
    }

    /// Ids of the named scopes currently alive, in creation order.
    pub fn scope_ids(&self) -> Vec<ScopeId> {
        self.inner.scopes.lock().iter().filter_map(|s| s.id().cloned()).collect()
    }

    pub fn has(&self, id: impl Into<ServiceIdentifier>) -> bool {
        self.default_scope().has(id)
    }

    pub fn get_any(&self, id: impl Into<ServiceIdentifier>) -> DiResult<AnyArc> {
        self.default_scope().get_any(id)
    }

    pub fn get_many_any(&self, id: impl Into<ServiceIdentifier>) -> DiResult<Vec<AnyArc>> {
        self.default_scope().get_many_any(id)
    }

    /// Stores a record in the default scope.
    pub fn set(&self, meta: ServiceMetadata) -> &Self {
        self.default_scope().set(meta);
        self
    }

    /// Stores a ready value in the default scope.
    pub fn set_value<T>(&self, id: impl Into<ServiceIdentifier>, value: T) -> &Self
    where
        T: std::any::Any + Send + Sync,
    {
        self.default_scope().set_value(id, value);
        self
    }

    pub fn set_arc(&self, id: impl Into<ServiceIdentifier>, value: AnyArc) -> &Self {
        self.default_scope().set_arc(id, value);
        self
    }

    pub fn set_all<I>(&self, records: I) -> &Self
    where
        I: IntoIterator<Item = ServiceMetadata>,
    {
        self.default_scope().set_all(records);
        self
    }

    pub fn remove<I, T>(&self, ids: I) -> &Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ServiceIdentifier>,
    {
        self.default_scope().remove(ids);
        self
    }

    /// Clears the default scope and every named scope, keeping the named
    /// scopes in the directory. Grouped records survive.
    pub fn reset(&self) -> &Self {
        self.default_scope().reset();
        for scope in self.inner.scopes.lock().iter() {
            scope.reset();
        }
        self
    }

    /// Clears the named scope `id` and drops it from the directory; the
    /// next `of` with an equal id creates a new, empty scope.
    pub fn reset_scope(&self, id: impl Into<ScopeId>) -> &Self {
        let id = id.into();
        let removed = {
            let mut scopes = self.inner.scopes.lock();
            scopes
                .iter()
                .position(|s| s.id() == Some(&id))
                .map(|index| scopes.remove(index))
        };
        if let Some(scope) = removed {
            scope.reset();
            tracing::debug!(scope = %id, "dropped scope");
        }
        self
    }

    /// Files `handler` under its target.
    pub fn register_handler(&self, handler: Handler) -> &Self {
        tracing::debug!(target_service = %handler.target(), kind = ?handler.kind(), "registering handler");
        self.inner.shared.handlers.register(handler);
        self
    }

    /// Number of registered handlers across all targets.
    pub fn handler_count(&self) -> usize {
        self.inner.shared.handlers.len()
    }

    /// Records of the default scope.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.default_scope().descriptors()
    }

    /// Human-readable dump of every scope and its records.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let mut dump = |label: &str, scope: &Scope| {
            let _ = writeln!(out, "{}:", label);
            for descriptor in scope.descriptors() {
                let _ = writeln!(out, "  {}", descriptor);
            }
        };

        dump("default", &self.default_scope());
        for scope in self.inner.scopes.lock().iter() {
            if let Some(id) = scope.id() {
                dump(&format!("scope {}", id), scope);
            }
        }
        let _ = writeln!(out, "handlers: {}", self.handler_count());
        out
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("services", &self.inner.shared.default.len())
            .field("scopes", &self.scope_ids())
            .field("handlers", &self.handler_count())
            .finish()
    }
}

impl ResolverCore for Container {
    fn resolve_any(&self, id: &ServiceIdentifier) -> DiResult<AnyArc> {
        self.default_scope().resolve_any(id)
    }

    fn resolve_many(&self, id: &ServiceIdentifier) -> DiResult<Vec<AnyArc>> {
        self.default_scope().resolve_many(id)
    }

    fn contains(&self, id: &ServiceIdentifier) -> bool {
        self.default_scope().contains(id)
    }
}
