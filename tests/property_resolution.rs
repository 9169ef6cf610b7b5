/// Property-based tests for service resolution
///
/// These tests verify that resolution behavior follows expected patterns
/// regardless of the specific names, values or scope ids used.

use ferrous_registry::{Args, Container, DiResult, Injectable, Resolver, ServiceMetadata};
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug)]
struct Stateless;

impl Injectable for Stateless {
    fn construct(_args: &Args<'_>) -> DiResult<Self> {
        Ok(Stateless)
    }
}

// Property: singletons resolve to the same instance however often they are asked for
proptest! {
    #[test]
    fn singleton_resolution_consistency(name in "[a-z]{1,16}", value in any::<u64>(), lookups in 1usize..10) {
        let container = Container::new();
        container.set(ServiceMetadata::for_id(name.as_str()).factory(ferrous_registry::Factory::function(move |_| Ok(value))));

        let first = container.get::<u64>(name.as_str()).unwrap();
        prop_assert_eq!(*first, value);
        for _ in 0..lookups {
            let again = container.get::<u64>(name.as_str()).unwrap();
            prop_assert!(Arc::ptr_eq(&first, &again));
        }
    }
}

// Property: grouped records come back in registration order
proptest! {
    #[test]
    fn grouped_values_keep_registration_order(values in prop::collection::vec(any::<i32>(), 1..20)) {
        let container = Container::new();
        for v in &values {
            container.set(ServiceMetadata::for_id("group").value(*v).multiple());
        }

        let resolved: Vec<i32> = container
            .get_many::<i32>("group")
            .unwrap()
            .into_iter()
            .map(|v| *v)
            .collect();
        prop_assert_eq!(resolved, values);
    }
}

// Property: the last set for a name wins and never duplicates the record
proptest! {
    #[test]
    fn last_set_wins(values in prop::collection::vec(any::<u16>(), 1..10)) {
        let container = Container::new();
        for v in &values {
            container.set_value("setting", *v);
        }

        prop_assert_eq!(*container.get::<u16>("setting").unwrap(), *values.last().unwrap());
        prop_assert_eq!(container.descriptors().len(), 1);
    }
}

// Property: every distinct scope id gets its own instance, equal ids share one
proptest! {
    #[test]
    fn scopes_isolate_by_id(ids in prop::collection::vec(0u64..5, 1..12)) {
        let container = Container::new();
        let resolved: Vec<_> = ids
            .iter()
            .map(|id| container.of(*id).get_type::<Stateless>().unwrap())
            .collect();

        for (i, a) in ids.iter().enumerate() {
            for (j, b) in ids.iter().enumerate() {
                prop_assert_eq!(a == b, Arc::ptr_eq(&resolved[i], &resolved[j]));
            }
        }
    }
}
