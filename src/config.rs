//! Container configuration.
//!
//! Options can be set in code through [`ContainerBuilder`](crate::ContainerBuilder),
//! read from the environment, or (feature `config`) parsed from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};

/// Environment variable toggling cycle detection (`true` / `false` / `1` / `0`).
pub const ENV_DETECT_CYCLES: &str = "FERROUS_REGISTRY_DETECT_CYCLES";

/// Environment variable setting the maximum resolution depth.
pub const ENV_MAX_DEPTH: &str = "FERROUS_REGISTRY_MAX_DEPTH";

/// Default nesting limit. Each level costs several frames, so this stays well
/// inside a 2 MiB thread stack in debug builds.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Resolution settings shared by every scope of a container.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{ContainerBuilder, ContainerOptions};
///
/// let options = ContainerOptions::default().max_depth(64);
/// assert!(options.detect_cycles);
///
/// let container = ContainerBuilder::new().options(options).build();
/// assert_eq!(container.options().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Fail with `Circular` when a key re-enters its own production
    pub detect_cycles: bool,
    /// Nesting limit for dependency production on one thread
    pub max_depth: usize,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self { detect_cycles: true, max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl ContainerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detect_cycles(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Defaults overridden by whichever environment variables are set.
    pub fn from_env() -> DiResult<Self> {
        let mut options = Self::default();

        if let Ok(value) = env::var(ENV_DETECT_CYCLES) {
            options.detect_cycles = parse_flag(ENV_DETECT_CYCLES, &value)?;
        }

        if let Ok(value) = env::var(ENV_MAX_DEPTH) {
            options.max_depth = value.trim().parse::<usize>().map_err(|_| {
                DiError::InvalidOptions(format!("{} must be a positive integer, got '{}'", ENV_MAX_DEPTH, value))
            })?;
        }

        if options.max_depth == 0 {
            return Err(DiError::InvalidOptions(format!("{} must be greater than zero", ENV_MAX_DEPTH)));
        }

        Ok(options)
    }

    /// Parses options from a JSON document; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        serde_json::from_str(json).map_err(|e| DiError::InvalidOptions(e.to_string()))
    }
}

fn parse_flag(name: &str, value: &str) -> DiResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DiError::InvalidOptions(format!("{} must be a boolean, got '{}'", name, value))),
    }
}
