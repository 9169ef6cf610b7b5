//! Error types for the service registry.

use std::fmt;

/// Registry and resolution errors
///
/// Every failure is reported synchronously by the call that hit it. A failed
/// dependency aborts the whole enclosing instantiation; nothing is retried
/// or substituted.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Container, DiError};
///
/// let container = Container::new();
/// match container.get_any("missing") {
///     Err(DiError::ServiceNotFound(id)) => assert_eq!(id, "\"missing\""),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_registry::DiError;
///
/// let circular = DiError::Circular(vec!["A".to_string(), "B".to_string(), "A".to_string()]);
/// assert_eq!(circular.to_string(), "Circular dependency: A -> B -> A");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// Named or tokenized service requested with no record and no type to build
    ServiceNotFound(String),
    /// No record exists and no constructible type could be derived
    MissingProvidedServiceType(String),
    /// Injection target resolved to the generic object type
    CannotInject {
        /// Host type or identifier the injection was declared on
        target: String,
        /// Property name, or `#<index>` for a constructor parameter
        property: String,
    },
    /// Value downcast failed
    TypeMismatch(&'static str),
    /// Circular dependency detected (includes path)
    Circular(Vec<String>),
    /// Maximum recursion depth exceeded
    DepthExceeded(usize),
    /// A property handler targeted a property the type does not accept
    UnknownProperty {
        /// Type the property was assigned on
        ty: &'static str,
        /// Property name
        property: String,
    },
    /// A factory pair named a method the factory type does not provide
    UnknownMethod {
        /// Factory type
        ty: &'static str,
        /// Method name
        method: String,
    },
    /// A constructor asked for a positional argument that was not supplied
    MissingArgument {
        /// Zero-based position
        index: usize,
        /// Expected argument type
        ty: &'static str,
    },
    /// Container options could not be parsed
    InvalidOptions(String),
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::ServiceNotFound(id) => write!(
                f,
                "Service {} was not found, looks like it was not registered in the container",
                id
            ),
            DiError::MissingProvidedServiceType(id) => write!(
                f,
                "Cannot determine a type to build for {}, register it with a type or a factory",
                id
            ),
            DiError::CannotInject { target, property } => write!(
                f,
                "Cannot inject value into {}.{}: the dependency type could not be determined",
                target, property
            ),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            DiError::UnknownProperty { ty, property } => {
                write!(f, "Type {} has no injectable property '{}'", ty, property)
            }
            DiError::UnknownMethod { ty, method } => {
                write!(f, "Type {} has no factory method '{}'", ty, method)
            }
            DiError::MissingArgument { index, ty } => {
                write!(f, "Constructor argument #{} of type {} was not supplied", index, ty)
            }
            DiError::InvalidOptions(reason) => write!(f, "Invalid container options: {}", reason),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for registry operations
pub type DiResult<T> = Result<T, DiError>;
