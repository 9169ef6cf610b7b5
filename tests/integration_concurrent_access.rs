/// Concurrent access integration tests
///
/// These tests verify that the registry behaves correctly under concurrent
/// access: singleton consistency, scope directory races and scope isolation.

use ferrous_registry::{
    Args, Container, DiError, DiResult, Factory, Injectable, ParamType, Resolver, ScopeId, ServiceMetadata,
};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

// ===== Test Services =====

#[derive(Debug)]
pub struct CounterService {
    count: AtomicU32,
}

impl CounterService {
    pub fn increment(&self) -> u32 {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get_count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }
}

impl Injectable for CounterService {
    fn construct(_args: &Args<'_>) -> DiResult<Self> {
        Ok(CounterService { count: AtomicU32::new(0) })
    }
}

pub struct Consumer {
    counter: Arc<CounterService>,
}

impl Injectable for Consumer {
    fn construct(args: &Args<'_>) -> DiResult<Self> {
        Ok(Consumer { counter: args.required::<CounterService>(0)? })
    }

    fn parameters() -> Vec<ParamType> {
        vec![ParamType::service::<CounterService>()]
    }
}

static SLOW_CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

/// Takes long enough to construct that racing threads overlap.
pub struct SlowService;

impl Injectable for SlowService {
    fn construct(_args: &Args<'_>) -> DiResult<Self> {
        SLOW_CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        Ok(SlowService)
    }
}

// ===== Tests =====

#[test]
fn test_singleton_thread_safety() {
    let container = Container::new();
    let thread_count = 10;
    let barrier = Arc::new(Barrier::new(thread_count));

    let handles: Vec<_> = (0..thread_count)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let counter = container.get_type::<CounterService>().unwrap();
                counter.increment();
                counter
            })
        })
        .collect();

    let counters: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Everyone observes the first cached instance
    for counter in &counters[1..] {
        assert!(Arc::ptr_eq(&counters[0], counter));
    }
    assert_eq!(counters[0].get_count(), thread_count as u32);
}

#[test]
fn test_singleton_constructed_once_under_contention() {
    let container = Container::new();
    let thread_count = 8;
    let barrier = Arc::new(Barrier::new(thread_count));

    let handles: Vec<_> = (0..thread_count)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                container.get_type::<SlowService>().unwrap()
            })
        })
        .collect();

    let services: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(SLOW_CONSTRUCTIONS.load(Ordering::SeqCst), 1);
    for service in &services[1..] {
        assert!(Arc::ptr_eq(&services[0], service));
    }
}

#[test]
fn test_failed_production_lets_a_waiter_retry() {
    let container = Container::new();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counted = attempts.clone();
    container.set(ServiceMetadata::for_id("flaky").factory(Factory::function(move |_| {
        let attempt = counted.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        if attempt == 0 {
            return Err(DiError::ServiceNotFound("\"upstream\"".to_string()));
        }
        Ok(attempt as u32)
    })));

    let thread_count = 6;
    let barrier = Arc::new(Barrier::new(thread_count));
    let handles: Vec<_> = (0..thread_count)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                container.get::<u32>("flaky").map(|v| *v)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // First producer fails, the next one in line succeeds, the rest share its value
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    assert!(results.iter().filter_map(|r| r.as_ref().ok()).all(|v| *v == 1));
}

#[test]
fn test_dependencies_are_shared_across_threads() {
    let container = Container::new();
    let thread_count = 8;
    let barrier = Arc::new(Barrier::new(thread_count));

    let handles: Vec<_> = (0..thread_count)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                container.get_type::<Consumer>().unwrap()
            })
        })
        .collect();

    let consumers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let counter = container.get_type::<CounterService>().unwrap();
    for consumer in &consumers {
        assert!(Arc::ptr_eq(&consumer.counter, &counter));
    }
}

#[test]
fn test_concurrent_scope_creation() {
    let container = Container::new();
    let thread_count = 16;
    let barrier = Arc::new(Barrier::new(thread_count));

    let handles: Vec<_> = (0..thread_count)
        .map(|i| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                // Half the threads race on the same id
                let id = if i % 2 == 0 { ScopeId::from("shared") } else { ScopeId::from(i as u64) };
                container.of(id).get_type::<CounterService>().unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let shared = container.of("shared").get_type::<CounterService>().unwrap();
    for (i, counter) in results.iter().enumerate() {
        if i % 2 == 0 {
            assert!(Arc::ptr_eq(counter, &shared));
        } else {
            assert!(!Arc::ptr_eq(counter, &shared));
        }
    }
    assert_eq!(container.scope_ids().len(), 1 + thread_count / 2);
}

#[test]
fn test_scoped_threads_share_globals() {
    let container = Container::new();
    container.set(ServiceMetadata::of_type::<CounterService>().global());

    crossbeam_utils::thread::scope(|s| {
        for i in 0..4u64 {
            let container = &container;
            s.spawn(move |_| {
                for _ in 0..100 {
                    container.of(i).get_type::<CounterService>().unwrap().increment();
                }
            });
        }
    })
    .unwrap();

    assert_eq!(container.get_type::<CounterService>().unwrap().get_count(), 400);
}

#[test]
fn test_concurrent_set_and_get() {
    let container = Container::new();

    crossbeam_utils::thread::scope(|s| {
        for i in 0..4u32 {
            let container = &container;
            s.spawn(move |_| {
                let name = format!("value-{}", i);
                for n in 0..50u32 {
                    container.set_value(name.as_str(), n);
                    let seen = *container.get::<u32>(name.as_str()).unwrap();
                    assert!(seen <= n);
                }
            });
        }
    })
    .unwrap();

    for i in 0..4 {
        assert_eq!(*container.get::<u32>(format!("value-{}", i)).unwrap(), 49);
    }
}
