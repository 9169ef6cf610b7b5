/// Unit tests for DiError and DiResult types

use ferrous_registry::{DiError, DiResult};
use std::error::Error;

#[test]
fn test_error_display_service_not_found() {
    let error = DiError::ServiceNotFound("\"logger\"".to_string());
    let display_str = format!("{}", error);
    assert_eq!(
        display_str,
        "Service \"logger\" was not found, looks like it was not registered in the container"
    );
}

#[test]
fn test_error_display_missing_type() {
    let error = DiError::MissingProvidedServiceType("Token#3".to_string());
    assert_eq!(
        error.to_string(),
        "Cannot determine a type to build for Token#3, register it with a type or a factory"
    );
}

#[test]
fn test_error_display_cannot_inject() {
    let error = DiError::CannotInject { target: "Mailer".to_string(), property: "sender".to_string() };
    assert_eq!(
        error.to_string(),
        "Cannot inject value into Mailer.sender: the dependency type could not be determined"
    );
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch("std::string::String");
    assert_eq!(error.to_string(), "Type mismatch for: std::string::String");
}

#[test]
fn test_error_display_circular() {
    let error = DiError::Circular(vec!["A".to_string(), "B".to_string(), "A".to_string()]);
    assert_eq!(error.to_string(), "Circular dependency: A -> B -> A");
}

#[test]
fn test_error_display_depth_exceeded() {
    assert_eq!(DiError::DepthExceeded(64).to_string(), "Max depth 64 exceeded");
}

#[test]
fn test_error_display_unknown_members() {
    let property = DiError::UnknownProperty { ty: "Mailer", property: "port".to_string() };
    assert_eq!(property.to_string(), "Type Mailer has no injectable property 'port'");

    let method = DiError::UnknownMethod { ty: "CarFactory", method: "create_bus".to_string() };
    assert_eq!(method.to_string(), "Type CarFactory has no factory method 'create_bus'");
}

#[test]
fn test_error_display_missing_argument() {
    let error = DiError::MissingArgument { index: 1, ty: "Engine" };
    assert_eq!(error.to_string(), "Constructor argument #1 of type Engine was not supplied");
}

#[test]
fn test_error_display_invalid_options() {
    let error = DiError::InvalidOptions("max_depth must be greater than zero".to_string());
    assert_eq!(error.to_string(), "Invalid container options: max_depth must be greater than zero");
}

#[test]
fn test_error_trait() {
    let error = DiError::DepthExceeded(1);
    let as_error: &dyn Error = &error;
    assert!(as_error.source().is_none());
}

#[test]
fn test_di_result_propagates() {
    fn inner() -> DiResult<u32> {
        Err(DiError::TypeMismatch("u32"))
    }

    fn outer() -> DiResult<u32> {
        let value = inner()?;
        Ok(value + 1)
    }

    assert_eq!(outer(), Err(DiError::TypeMismatch("u32")));
}
