//! Process-wide container.

use once_cell::sync::Lazy;

use crate::container::Container;

// Created on first access with default options.
static GLOBAL_CONTAINER: Lazy<Container> = Lazy::new(Container::default);

/// The process-wide container.
///
/// Explicitly constructed containers are preferred; this exists for code
/// that wants a static entry point. Tests touching it should call
/// [`Container::reset`] and run serially.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{global, Resolver};
///
/// global().set_value("app.name", "inventory");
/// assert_eq!(*global().get::<&'static str>("app.name").unwrap(), "inventory");
/// ```
pub fn global() -> &'static Container {
    &GLOBAL_CONTAINER
}
