//! Container construction.

use std::sync::Arc;

use super::{Container, ContainerShared};
use crate::config::ContainerOptions;
use crate::handler::HandlerRegistry;
use crate::observer::{Observers, RegistryObserver};
use crate::reflection::{DeclaredParameters, TypeReflector};
use crate::registration::Registry;

/// Builder for a [`Container`] with a custom reflector, observers or options.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{ContainerBuilder, ContainerOptions, LoggingObserver, NoReflection};
/// use std::sync::Arc;
///
/// let container = ContainerBuilder::new()
///     .reflector(NoReflection)
///     .add_observer(Arc::new(LoggingObserver::new()))
///     .options(ContainerOptions::default().detect_cycles(false))
///     .build();
///
/// assert!(!container.options().detect_cycles);
/// ```
pub struct ContainerBuilder {
    reflector: Arc<dyn TypeReflector>,
    observers: Observers,
    options: ContainerOptions,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            reflector: Arc::new(DeclaredParameters),
            observers: Observers::new(),
            options: ContainerOptions::default(),
        }
    }

    /// Source of constructor parameter types.
    pub fn reflector<R: TypeReflector + 'static>(mut self, reflector: R) -> Self {
        self.reflector = Arc::new(reflector);
        self
    }

    pub fn shared_reflector(mut self, reflector: Arc<dyn TypeReflector>) -> Self {
        self.reflector = reflector;
        self
    }

    pub fn add_observer(mut self, observer: Arc<dyn RegistryObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    pub fn options(mut self, options: ContainerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Container {
        tracing::debug!(
            detect_cycles = self.options.detect_cycles,
            max_depth = self.options.max_depth,
            "building container"
        );
        Container::from_shared(ContainerShared {
            default: Arc::new(Registry::new()),
            handlers: HandlerRegistry::new(),
            reflector: self.reflector,
            observers: self.observers,
            options: self.options,
        })
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
