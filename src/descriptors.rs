//! Service descriptors for introspection and diagnostics.

use std::fmt;

use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::metadata::{Factory, ServiceMetadata};

/// Read-only snapshot of one service record.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Container, Lifetime, ServiceMetadata};
///
/// let container = Container::new();
/// container
///     .set_value("port", 5432u16)
///     .set(ServiceMetadata::for_id("clock").value(0u64).transient())
///     .set(ServiceMetadata::for_id("plugin").value("a").multiple());
///
/// let descriptors = container.descriptors();
/// assert_eq!(descriptors.len(), 3);
///
/// let port = descriptors.iter().find(|d| d.service_name() == Some("port")).unwrap();
/// assert!(port.cached);
/// assert_eq!(port.lifetime, Lifetime::Singleton);
///
/// let plugin = descriptors.iter().find(|d| d.multiple).unwrap();
/// assert_eq!(plugin.service_name(), Some("plugin"));
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// Registry key of the record
    pub key: Key,
    /// Lifecycle derived from the record flags
    pub lifetime: Lifetime,
    /// Grouped (multi-bound) record
    pub multiple: bool,
    /// Whether a value is cached
    pub cached: bool,
    /// Type the record constructs, if any
    pub type_name: Option<&'static str>,
    /// Factory description, if any
    pub factory: Option<String>,
}

impl ServiceDescriptor {
    pub(crate) fn from_metadata(meta: &ServiceMetadata) -> Self {
        Self {
            key: meta.id().key(),
            lifetime: meta.get_lifetime(),
            multiple: meta.is_multiple(),
            cached: meta.cached_value().is_some(),
            type_name: meta.get_type().map(|ty| ty.name()),
            factory: meta.get_factory().map(|factory| match factory {
                Factory::Function(_) => "function".to_string(),
                Factory::Method { owner, method } => format!("{}::{}", owner.name(), method),
            }),
        }
    }

    /// The name, for records registered under a string name.
    pub fn service_name(&self) -> Option<&str> {
        match &self.key {
            Key::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_named(&self) -> bool {
        self.service_name().is_some()
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{:?}", self.key, self.lifetime)?;
        if self.multiple {
            f.write_str(", multiple")?;
        }
        if self.cached {
            f.write_str(", cached")?;
        }
        f.write_str("]")?;
        if let Some(ty) = self.type_name {
            write!(f, " type={}", ty)?;
        }
        if let Some(factory) = &self.factory {
            write!(f, " factory={}", factory)?;
        }
        Ok(())
    }
}
