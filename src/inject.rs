//! Handler builders for injecting services into properties and parameters.
//!
//! [`Inject`] describes *what* to inject; turning it into a [`Handler`] says
//! *where*. The resulting handler resolves the dependency from whichever
//! scope is building the target.

use std::sync::Arc;

use crate::container::Scope;
use crate::error::{DiError, DiResult};
use crate::handler::Handler;
use crate::key::ServiceIdentifier;
use crate::reflection::ParamType;
use crate::service_type::{AnyArc, Injectable};

#[derive(Debug, Clone)]
enum Source {
    Identifier(ServiceIdentifier),
    Reflected(ParamType),
}

/// Dependency to inject.
///
/// With [`many`](Inject::many) the handler yields every grouped value as an
/// `Arc<Vec<AnyArc>>` instead of a single value.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Args, Container, DiError, DiResult, Inject, Injectable, Resolver, AnyArc};
/// use std::sync::Arc;
///
/// struct Mailer {
///     sender: Option<Arc<String>>,
/// }
///
/// impl Injectable for Mailer {
///     fn construct(_args: &Args<'_>) -> DiResult<Self> {
///         Ok(Mailer { sender: None })
///     }
///
///     fn assign_property(&mut self, name: &str, value: AnyArc) -> DiResult<()> {
///         match name {
///             "sender" => {
///                 self.sender = value.downcast::<String>().ok();
///                 Ok(())
///             }
///             _ => Err(DiError::UnknownProperty { ty: "Mailer", property: name.to_string() }),
///         }
///     }
/// }
///
/// let container = Container::new();
/// container.set_value("mail.sender", "noreply@example.com".to_string());
/// container.register_handler(Inject::identifier("mail.sender").property_of::<Mailer>("sender"));
///
/// let mailer = container.get_type::<Mailer>().unwrap();
/// assert_eq!(mailer.sender.as_deref().map(String::as_str), Some("noreply@example.com"));
/// ```
#[derive(Debug, Clone)]
pub struct Inject {
    source: Source,
    many: bool,
}

impl Inject {
    /// Inject the service registered under `id`.
    pub fn identifier(id: impl Into<ServiceIdentifier>) -> Self {
        Self { source: Source::Identifier(id.into()), many: false }
    }

    /// Inject the service of type `T`.
    pub fn of<T: Injectable>() -> Self {
        Self::identifier(ServiceIdentifier::of::<T>())
    }

    /// Inject whatever the reflected declaration names. Primitive and
    /// generic object declarations carry no service identity and fail with
    /// [`DiError::CannotInject`] when the handler runs.
    pub fn reflected(param: ParamType) -> Self {
        Self { source: Source::Reflected(param), many: false }
    }

    /// Inject every grouped value instead of a single one.
    pub fn many(mut self) -> Self {
        self.many = true;
        self
    }

    /// Handler for property `name` of `target`.
    pub fn property(self, target: impl Into<ServiceIdentifier>, name: impl Into<String>) -> Handler {
        let target = target.into();
        let name = name.into();
        let label = name.clone();
        let host = target.to_string();
        Handler::property(target, name, move |scope| self.provide(scope, &host, &label))
    }

    /// Handler for property `name` of the type `T`.
    pub fn property_of<T: Injectable>(self, name: impl Into<String>) -> Handler {
        self.property(ServiceIdentifier::of::<T>(), name)
    }

    /// Handler for constructor parameter `index` of `target`.
    pub fn parameter(self, target: impl Into<ServiceIdentifier>, index: usize) -> Handler {
        let target = target.into();
        let label = format!("#{}", index);
        let host = target.to_string();
        Handler::parameter(target, index, move |scope| self.provide(scope, &host, &label))
    }

    /// Handler for constructor parameter `index` of the type `T`.
    pub fn parameter_of<T: Injectable>(self, index: usize) -> Handler {
        self.parameter(ServiceIdentifier::of::<T>(), index)
    }

    fn provide(&self, scope: &Scope, host: &str, property: &str) -> DiResult<AnyArc> {
        let identifier = match &self.source {
            Source::Identifier(id) => id.clone(),
            Source::Reflected(ParamType::Service(ty)) => ServiceIdentifier::Type(*ty),
            Source::Reflected(_) => {
                return Err(DiError::CannotInject {
                    target: host.to_string(),
                    property: property.to_string(),
                })
            }
        };

        if self.many {
            let values = scope.get_many_any(identifier)?;
            Ok(Arc::new(values) as AnyArc)
        } else {
            scope.get_any(identifier)
        }
    }
}
