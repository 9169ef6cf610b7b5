//! Opaque identity tokens used as registry keys.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

struct TokenInner {
    serial: u64,
    name: Option<String>,
}

/// Type-erased token identity.
///
/// Two `AnyToken`s are equal only when they were cloned from the same
/// original token. The optional name is for diagnostics and never takes
/// part in comparisons.
#[derive(Clone)]
pub struct AnyToken {
    inner: Arc<TokenInner>,
}

impl AnyToken {
    fn new(name: Option<String>) -> Self {
        Self {
            inner: Arc::new(TokenInner {
                serial: NEXT_TOKEN.fetch_add(1, Ordering::Relaxed),
                name,
            }),
        }
    }

    /// Human-readable name given at construction, if any.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }
}

impl PartialEq for AnyToken {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for AnyToken {}

impl Hash for AnyToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.serial.hash(state);
    }
}

impl fmt::Debug for AnyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for AnyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.name {
            Some(name) => write!(f, "Token({})", name),
            None => write!(f, "Token#{}", self.inner.serial),
        }
    }
}

/// Unique identity usable as a service key when neither a name nor a type fits.
///
/// The type parameter only documents (and lets [`Resolver::get_token`] enforce)
/// what the token resolves to; identity is all a token carries.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Container, Resolver, Token};
///
/// let first = Token::<String>::named("first");
/// let second = Token::<String>::named("first");
/// assert_ne!(first, second); // same name, different identity
///
/// let container = Container::new();
/// container.set_value(&first, "one".to_string());
/// assert_eq!(*container.get_token(&first).unwrap(), "one");
/// assert!(container.get_token(&second).is_err());
/// ```
///
/// [`Resolver::get_token`]: crate::Resolver::get_token
pub struct Token<T: ?Sized> {
    raw: AnyToken,
    _marker: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized> Token<T> {
    /// Creates a fresh anonymous token.
    pub fn new() -> Self {
        Self { raw: AnyToken::new(None), _marker: PhantomData }
    }

    /// Creates a fresh token carrying a diagnostic name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { raw: AnyToken::new(Some(name.into())), _marker: PhantomData }
    }

    /// Diagnostic name, if any.
    pub fn name(&self) -> Option<&str> {
        self.raw.name()
    }

    /// Erased identity of this token.
    pub fn raw(&self) -> &AnyToken {
        &self.raw
    }
}

impl<T: ?Sized> Default for Token<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Token<T> {
    fn clone(&self) -> Self {
        Self { raw: self.raw.clone(), _marker: PhantomData }
    }
}

impl<T: ?Sized> PartialEq for Token<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: ?Sized> Eq for Token<T> {}

impl<T: ?Sized> Hash for Token<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}
