//! Resolution observers.
//!
//! Observers see every value a scope actually produces (cache hits are not
//! reported). They are called synchronously on the resolving thread, so keep
//! implementations cheap.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::Key;

/// Hooks for resolution events.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{ContainerBuilder, DiError, Key, RegistryObserver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Counter(AtomicUsize);
///
/// impl RegistryObserver for Counter {
///     fn resolving(&self, _key: &Key) {}
///
///     fn resolved(&self, _key: &Key, _duration: Duration) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let counter = Arc::new(Counter::default());
/// let container = ContainerBuilder::new().add_observer(counter.clone()).build();
/// container.set_value("answer", 42u32);
/// container.get_any("answer").unwrap();
///
/// // Pre-set values are cache hits and are not reported
/// assert_eq!(counter.0.load(Ordering::SeqCst), 0);
/// ```
pub trait RegistryObserver: Send + Sync {
    /// Production of `key` is starting.
    fn resolving(&self, key: &Key);

    /// `key` was produced in `duration`.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Production of `key` failed. The error still propagates to the caller.
    fn failed(&self, key: &Key, error: &DiError) {
        let _ = (key, error);
    }
}

/// Registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn RegistryObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn RegistryObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Built-in observer forwarding events to `tracing`.
///
/// Production start and finish are emitted at `DEBUG`, failures at `WARN`.
///
/// ```rust
/// use ferrous_registry::{ContainerBuilder, LoggingObserver};
/// use std::sync::Arc;
///
/// let container = ContainerBuilder::new()
///     .add_observer(Arc::new(LoggingObserver::with_prefix("app")))
///     .build();
/// # let _ = container;
/// ```
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self { prefix: "ferrous-registry".to_string() }
    }

    /// Observer tagging every event with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::debug!(prefix = %self.prefix, service = %key, "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(prefix = %self.prefix, service = %key, elapsed = ?duration, "resolved");
    }

    fn failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(prefix = %self.prefix, service = %key, %error, "resolution failed");
    }
}
