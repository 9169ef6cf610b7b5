use ferrous_registry::config::{ENV_DETECT_CYCLES, ENV_MAX_DEPTH};
use ferrous_registry::{ContainerBuilder, ContainerOptions, DiError};
use serial_test::serial;
use std::env;

fn clear() {
    env::remove_var(ENV_DETECT_CYCLES);
    env::remove_var(ENV_MAX_DEPTH);
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear();
    assert_eq!(ContainerOptions::from_env().unwrap(), ContainerOptions::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear();
    env::set_var(ENV_DETECT_CYCLES, "false");
    env::set_var(ENV_MAX_DEPTH, "32");

    let options = ContainerOptions::from_env().unwrap();
    assert!(!options.detect_cycles);
    assert_eq!(options.max_depth, 32);

    let container = ContainerBuilder::new().options(options).build();
    assert_eq!(container.options().max_depth, 32);
    clear();
}

#[test]
#[serial]
fn test_from_env_rejects_bad_values() {
    clear();
    env::set_var(ENV_MAX_DEPTH, "lots");
    assert!(matches!(ContainerOptions::from_env(), Err(DiError::InvalidOptions(_))));

    env::set_var(ENV_MAX_DEPTH, "0");
    assert!(matches!(ContainerOptions::from_env(), Err(DiError::InvalidOptions(_))));

    clear();
    env::set_var(ENV_DETECT_CYCLES, "sometimes");
    assert!(matches!(ContainerOptions::from_env(), Err(DiError::InvalidOptions(_))));
    clear();
}
