//! Service lifetime definitions.

/// Caching behavior of a registered service
///
/// A record stores its lifecycle as independent `global` / `transient`
/// flags; `Lifetime` is the one-word view of those flags used for
/// registration shortcuts and diagnostics.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Args, Container, DiResult, Injectable, Lifetime, Resolver, ServiceMetadata};
/// use std::sync::Arc;
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn construct(_args: &Args<'_>) -> DiResult<Self> {
///         Ok(Clock)
///     }
/// }
///
/// let container = Container::new();
/// container.set(ServiceMetadata::of_type::<Clock>().lifetime(Lifetime::Transient));
///
/// let a = container.get_type::<Clock>().unwrap();
/// let b = container.get_type::<Clock>().unwrap();
/// assert!(!Arc::ptr_eq(&a, &b)); // Always different
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifetime {
    /// One cached instance per scope
    ///
    /// Named scopes inherit the registration from the default scope but
    /// build and cache their own instance.
    Singleton,
    /// New instance per resolution, never cached
    Transient,
    /// One instance shared by every scope
    ///
    /// Always produced and cached in the default scope, whichever scope
    /// asked for it.
    Global,
}

impl Lifetime {
    /// Derives the lifetime from record flags. `transient` wins over `global`.
    pub fn from_flags(global: bool, transient: bool) -> Self {
        match (global, transient) {
            (_, true) => Lifetime::Transient,
            (true, false) => Lifetime::Global,
            (false, false) => Lifetime::Singleton,
        }
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Lifetime::Singleton
    }
}
