use ferrous_registry::{
    Args, Container, DiError, DiResult, Factory, Injectable, Resolver, ServiceIdentifier, ServiceMetadata, Token,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct TestService {
    name: String,
}

impl Injectable for TestService {
    fn construct(_args: &Args<'_>) -> DiResult<Self> {
        Ok(TestService { name: "frank".to_string() })
    }
}

struct TestServiceFactory;

impl Injectable for TestServiceFactory {
    fn construct(_args: &Args<'_>) -> DiResult<Self> {
        Ok(TestServiceFactory)
    }

    fn invoke(&self, method: &str, _args: &Args<'_>) -> DiResult<ferrous_registry::AnyBox> {
        match method {
            "create" => Ok(Box::new("test3-service-created-by-factory")),
            _ => Err(DiError::UnknownMethod { ty: "TestServiceFactory", method: method.to_string() }),
        }
    }
}

fn named(name: &str) -> TestService {
    TestService { name: name.to_string() }
}

#[test]
fn test_falsy_values_are_still_values() {
    let container = Container::new();
    container
        .set_value("boolean.true", true)
        .set_value("boolean.false", false)
        .set_value("emptyString", String::new())
        .set_value("zero", 0i32);

    assert!(*container.get::<bool>("boolean.true").unwrap());
    assert!(!*container.get::<bool>("boolean.false").unwrap());
    assert_eq!(*container.get::<String>("emptyString").unwrap(), "");
    assert_eq!(*container.get::<i32>("zero").unwrap(), 0);
}

#[test]
fn test_set_value_for_type() {
    let container = Container::new();
    let service = Arc::new(named("this is test"));
    container.set_arc(ServiceIdentifier::of::<TestService>(), service.clone());

    let resolved = container.get_type::<TestService>().unwrap();
    assert!(Arc::ptr_eq(&resolved, &service));
    assert_eq!(resolved.name, "this is test");
}

#[test]
fn test_named_services() {
    let container = Container::new();
    container
        .set_value("first.service", named("first"))
        .set_value("second.service", named("second"));

    assert_eq!(container.get::<TestService>("first.service").unwrap().name, "first");
    assert_eq!(container.get::<TestService>("second.service").unwrap().name, "second");
}

#[test]
fn test_tokenized_services() {
    let first = Token::<TestService>::new();
    let second = Token::<TestService>::new();

    let container = Container::new();
    container.set_value(&first, named("first")).set_value(&second, named("second"));

    assert_eq!(container.get_token(&first).unwrap().name, "first");
    assert_eq!(container.get_token(&second).unwrap().name, "second");
}

#[test]
fn test_service_wrapper_resolves_to_token() {
    let token = Token::<TestService>::new();
    let container = Container::new();
    container.set_value(ServiceIdentifier::service(&token), named("first"));

    let wrapped = container.get::<TestService>(ServiceIdentifier::service(&token)).unwrap();
    let plain = container.get_token(&token).unwrap();
    assert_eq!(wrapped.name, "first");
    assert!(Arc::ptr_eq(&wrapped, &plain));
    assert!(container.has(ServiceIdentifier::service(&token)));
}

#[test]
fn test_unknown_service_wrapper_has_no_type() {
    let unknown = Token::<TestService>::new();
    let container = Container::new();

    let result = container.get_any(ServiceIdentifier::service(&unknown));
    assert!(matches!(result, Err(DiError::MissingProvidedServiceType(_))));
}

#[test]
fn test_second_set_overrides_value() {
    let token = Token::<TestService>::new();
    let container = Container::new();

    container.set_value(&token, named("first"));
    assert_eq!(container.get_token(&token).unwrap().name, "first");

    container.set_value(&token, named("second"));
    assert_eq!(container.get_token(&token).unwrap().name, "second");
}

#[test]
fn test_set_merges_instead_of_duplicating() {
    let container = Container::new();
    container
        .set(ServiceMetadata::for_id("a").value(1u32))
        .set(ServiceMetadata::for_id("a").value(2u32));

    assert_eq!(*container.get::<u32>("a").unwrap(), 2);
    let count = container.descriptors().iter().filter(|d| d.service_name() == Some("a")).count();
    assert_eq!(count, 1);
}

#[test]
fn test_merge_keeps_unset_fields() {
    let container = Container::new();
    container
        .set(ServiceMetadata::for_id("svc").with_type::<TestService>().transient())
        .set(ServiceMetadata::for_id("svc").with_type::<TestService>());

    // Still transient: the second record did not mention the flag
    let a = container.get::<TestService>("svc").unwrap();
    let b = container.get::<TestService>("svc").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_set_list_of_records() {
    let container = Container::new();
    let service = Arc::new(named("typed"));
    let test1 = Arc::new(named("one"));
    let test2 = Arc::new(named("two"));

    container.set_all(vec![
        ServiceMetadata::of_type::<TestService>().value_arc(service.clone()),
        ServiceMetadata::for_id("test1-service").value_arc(test1.clone()),
        ServiceMetadata::for_id("test2-service").value_arc(test2.clone()),
        ServiceMetadata::for_id("test3-service").factory(Factory::method::<TestServiceFactory>("create")),
    ]);

    assert!(Arc::ptr_eq(&container.get_type::<TestService>().unwrap(), &service));
    assert!(Arc::ptr_eq(&container.get::<TestService>("test1-service").unwrap(), &test1));
    assert!(Arc::ptr_eq(&container.get::<TestService>("test2-service").unwrap(), &test2));
    assert_eq!(
        *container.get::<&'static str>("test3-service").unwrap(),
        "test3-service-created-by-factory"
    );
}

#[test]
fn test_remove_named_services() {
    let container = Container::new();
    let service = Arc::new(named("typed"));
    container.set_all(vec![
        ServiceMetadata::of_type::<TestService>().value_arc(service.clone()),
        ServiceMetadata::for_id("test1-service").value(named("one")),
        ServiceMetadata::for_id("test2-service").value(named("two")),
    ]);

    container.remove(["test1-service", "test2-service"]);

    assert!(Arc::ptr_eq(&container.get_type::<TestService>().unwrap(), &service));
    assert!(matches!(container.get_any("test1-service"), Err(DiError::ServiceNotFound(_))));
    assert!(matches!(container.get_any("test2-service"), Err(DiError::ServiceNotFound(_))));
    assert!(!container.has("test1-service"));
}

#[test]
fn test_removed_type_is_rebuilt() {
    let container = Container::new();
    let service = Arc::new(named("john"));
    container.set_arc(ServiceIdentifier::of::<TestService>(), service.clone());

    container.remove([ServiceIdentifier::of::<TestService>()]);

    let rebuilt = container.get_type::<TestService>().unwrap();
    assert!(!Arc::ptr_eq(&rebuilt, &service));
    assert_eq!(rebuilt.name, "frank");
}

#[test]
fn test_reset_rebuilds_types() {
    let container = Container::new();
    let service = Arc::new(named("john"));
    container.set_arc(ServiceIdentifier::of::<TestService>(), service.clone());
    assert_eq!(container.get_type::<TestService>().unwrap().name, "john");

    container.reset();

    let rebuilt = container.get_type::<TestService>().unwrap();
    assert!(!Arc::ptr_eq(&rebuilt, &service));
    assert_eq!(rebuilt.name, "frank");
}

#[test]
fn test_unknown_name_is_not_found() {
    let container = Container::new();
    let err = container.get_any("nope").unwrap_err();
    assert_eq!(err, DiError::ServiceNotFound("\"nope\"".to_string()));
    assert!(err.to_string().contains("was not found"));
}

#[test]
fn test_name_with_type_is_built_on_demand() {
    let container = Container::new();
    container.set(ServiceMetadata::for_id("svc").with_type::<TestService>());

    let a = container.get::<TestService>("svc").unwrap();
    let b = container.get::<TestService>("svc").unwrap();
    assert_eq!(a.name, "frank");
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_record_without_type_or_factory_is_not_found() {
    let container = Container::new();
    container.set(ServiceMetadata::for_id("empty"));

    assert!(container.has("empty"));
    assert!(matches!(container.get_any("empty"), Err(DiError::ServiceNotFound(_))));
}

#[test]
fn test_transient_types_are_rebuilt_every_time() {
    static BUILT: AtomicUsize = AtomicUsize::new(0);

    struct Fresh;
    impl Injectable for Fresh {
        fn construct(_args: &Args<'_>) -> DiResult<Self> {
            BUILT.fetch_add(1, Ordering::SeqCst);
            Ok(Fresh)
        }
    }

    let container = Container::new();
    container.set(ServiceMetadata::of_type::<Fresh>().transient());

    let a = container.get_type::<Fresh>().unwrap();
    let b = container.get_type::<Fresh>().unwrap();
    let c = container.get_type::<Fresh>().unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&b, &c));
    assert_eq!(BUILT.load(Ordering::SeqCst), 3);
}

#[test]
fn test_type_mismatch_on_wrong_downcast() {
    let container = Container::new();
    container.set_value("n", 1u8);
    assert!(matches!(container.get::<u64>("n"), Err(DiError::TypeMismatch(_))));
}
