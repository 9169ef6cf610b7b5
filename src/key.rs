//! Service identifiers and the normalized keys they map to.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::service_type::{Injectable, ServiceType};
use crate::token::{AnyToken, Token};

/// Everything a caller may use to name a service.
///
/// # Identifier Shapes
///
/// - **Name**: a string name (`"cfg.auth.jwt"`)
/// - **Token**: an opaque [`Token`]
/// - **Type**: a constructible [`ServiceType`]
/// - **Service**: the `{ service: token }` wrapper, letting a token stand
///   where a type is expected; it is normalized to its inner token
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Key, ServiceIdentifier, Token};
///
/// let token = Token::<String>::named("greeting");
/// let plain = ServiceIdentifier::from(&token);
/// let wrapped = ServiceIdentifier::service(&token);
///
/// // The wrapper and the bare token address the same registry slot.
/// assert_eq!(plain.key(), wrapped.key());
/// assert!(matches!(wrapped.key(), Key::Token(_)));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ServiceIdentifier {
    /// String name
    Name(Arc<str>),
    /// Opaque token
    Token(AnyToken),
    /// Constructible type
    Type(ServiceType),
    /// `{ service: token }` wrapper
    Service(AnyToken),
}

impl ServiceIdentifier {
    /// Identifier for the constructible type `T`.
    pub fn of<T: Injectable>() -> Self {
        ServiceIdentifier::Type(ServiceType::of::<T>())
    }

    /// Wraps a token as `{ service: token }`.
    pub fn service<T: ?Sized>(token: &Token<T>) -> Self {
        ServiceIdentifier::Service(token.raw().clone())
    }

    /// Canonical registry key: the wrapper collapses to its token.
    pub fn key(&self) -> Key {
        match self {
            ServiceIdentifier::Name(name) => Key::Name(name.clone()),
            ServiceIdentifier::Token(token) | ServiceIdentifier::Service(token) => {
                Key::Token(token.clone())
            }
            ServiceIdentifier::Type(ty) => Key::Type(*ty),
        }
    }

    /// Identifier in stored form, with the wrapper removed.
    pub fn normalized(&self) -> Self {
        match self {
            ServiceIdentifier::Service(token) => ServiceIdentifier::Token(token.clone()),
            other => other.clone(),
        }
    }

    /// True for bare names and bare tokens, the shapes that carry no buildable type.
    pub fn is_named(&self) -> bool {
        matches!(self, ServiceIdentifier::Name(_) | ServiceIdentifier::Token(_))
    }

    /// The constructible type, if this identifier is one.
    pub fn as_type(&self) -> Option<&ServiceType> {
        match self {
            ServiceIdentifier::Type(ty) => Some(ty),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceIdentifier::Name(name) => write!(f, "\"{}\"", name),
            ServiceIdentifier::Token(token) => write!(f, "{}", token),
            ServiceIdentifier::Type(ty) => f.write_str(ty.name()),
            ServiceIdentifier::Service(token) => write!(f, "{{ service: {} }}", token),
        }
    }
}

impl fmt::Debug for ServiceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<&str> for ServiceIdentifier {
    fn from(name: &str) -> Self {
        ServiceIdentifier::Name(Arc::from(name))
    }
}

impl From<String> for ServiceIdentifier {
    fn from(name: String) -> Self {
        ServiceIdentifier::Name(Arc::from(name))
    }
}

impl<T: ?Sized> From<&Token<T>> for ServiceIdentifier {
    fn from(token: &Token<T>) -> Self {
        ServiceIdentifier::Token(token.raw().clone())
    }
}

impl<T: ?Sized> From<Token<T>> for ServiceIdentifier {
    fn from(token: Token<T>) -> Self {
        ServiceIdentifier::Token(token.raw().clone())
    }
}

impl From<AnyToken> for ServiceIdentifier {
    fn from(token: AnyToken) -> Self {
        ServiceIdentifier::Token(token)
    }
}

impl From<ServiceType> for ServiceIdentifier {
    fn from(ty: ServiceType) -> Self {
        ServiceIdentifier::Type(ty)
    }
}

impl From<&ServiceIdentifier> for ServiceIdentifier {
    fn from(id: &ServiceIdentifier) -> Self {
        id.clone()
    }
}

/// Normalized registry key.
///
/// Names compare by value, tokens by identity, types by `TypeId`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(Arc<str>),
    Token(AnyToken),
    Type(ServiceType),
}

impl Key {
    /// Key for the constructible type `T`.
    pub fn of<T: Injectable>() -> Self {
        Key::Type(ServiceType::of::<T>())
    }

    /// `TypeId` for type keys.
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            Key::Type(ty) => Some(ty.type_id()),
            _ => None,
        }
    }

    /// The identifier this key was normalized from.
    pub fn to_identifier(&self) -> ServiceIdentifier {
        match self {
            Key::Name(name) => ServiceIdentifier::Name(name.clone()),
            Key::Token(token) => ServiceIdentifier::Token(token.clone()),
            Key::Type(ty) => ServiceIdentifier::Type(*ty),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "\"{}\"", name),
            Key::Token(token) => write!(f, "{}", token),
            Key::Type(ty) => f.write_str(ty.name()),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
