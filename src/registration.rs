//! Per-scope service storage.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard};

use crate::key::Key;
use crate::metadata::ServiceMetadata;
use crate::service_type::AnyArc;

/// Shared, mutable service record.
///
/// Records are handed out as `Arc`s so a later `set` for the same id can
/// merge into the record in place and everyone holding it sees the change.
///
/// Production of a cached value is serialized per record through
/// [`lock_production`](Self::lock_production), so a singleton is built once
/// no matter how many threads ask for it at the same time.
pub(crate) struct ServiceRecord {
    meta: Mutex<ServiceMetadata>,
    // Reentrant: recursion on one thread must reach the depth limit, not deadlock
    production: ReentrantMutex<()>,
}

impl ServiceRecord {
    pub(crate) fn new(meta: ServiceMetadata) -> Arc<Self> {
        Arc::new(Self { meta: Mutex::new(meta), production: ReentrantMutex::new(()) })
    }

    /// Held by the thread producing this record's value. Other threads
    /// wait here and then find the cached value.
    pub(crate) fn lock_production(&self) -> ReentrantMutexGuard<'_, ()> {
        self.production.lock()
    }

    /// Consistent copy of the record's fields.
    pub(crate) fn snapshot(&self) -> ServiceMetadata {
        self.meta.lock().clone()
    }

    pub(crate) fn cached_value(&self) -> Option<AnyArc> {
        self.meta.lock().value.clone()
    }

    pub(crate) fn is_global(&self) -> bool {
        self.meta.lock().is_global()
    }

    pub(crate) fn merge(&self, other: ServiceMetadata) {
        self.meta.lock().merge(other);
    }

    /// Stores `value` unless the record is transient or already cached.
    ///
    /// Returns the value callers should observe: the first one stored wins.
    pub(crate) fn cache(&self, value: AnyArc) -> AnyArc {
        let mut meta = self.meta.lock();
        if meta.is_transient() {
            return value;
        }
        match &meta.value {
            Some(existing) => existing.clone(),
            None => {
                meta.value = Some(value.clone());
                value
            }
        }
    }
}

#[derive(Default)]
struct Maps {
    services: HashMap<Key, Arc<ServiceRecord>>,
    grouped: HashMap<Key, Vec<Arc<ServiceRecord>>>,
}

/// Service registry of one scope: single-value records plus multi-bound groups
#[derive(Default)]
pub(crate) struct Registry {
    maps: Mutex<Maps>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Single-value record for `key`.
    #[inline]
    pub(crate) fn find(&self, key: &Key) -> Option<Arc<ServiceRecord>> {
        self.maps.lock().services.get(key).cloned()
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.maps.lock().services.contains_key(key)
    }

    /// Stores a record: multi records are appended to their group, others
    /// merge into an existing record or are inserted fresh.
    pub(crate) fn insert(&self, meta: ServiceMetadata) {
        let key = meta.id().key();
        let mut maps = self.maps.lock();
        if meta.is_multiple() {
            maps.grouped.entry(key).or_default().push(ServiceRecord::new(meta));
            return;
        }
        match maps.services.get(&key) {
            Some(existing) => existing.merge(meta),
            None => {
                maps.services.insert(key, ServiceRecord::new(meta));
            }
        }
    }

    /// Returns the record under `key`, inserting the one built by `make` if absent.
    pub(crate) fn find_or_insert_with<F>(&self, key: Key, make: F) -> Arc<ServiceRecord>
    where
        F: FnOnce() -> ServiceMetadata,
    {
        self.maps
            .lock()
            .services
            .entry(key)
            .or_insert_with(|| ServiceRecord::new(make()))
            .clone()
    }

    /// Inserts `record` unless one already exists; returns whichever is stored.
    pub(crate) fn insert_if_absent(&self, key: Key, record: Arc<ServiceRecord>) -> Arc<ServiceRecord> {
        self.maps.lock().services.entry(key).or_insert(record).clone()
    }

    /// Removes the single-value record; grouped records are untouched.
    pub(crate) fn remove(&self, key: &Key) -> bool {
        self.maps.lock().services.remove(key).is_some()
    }

    /// Removes the record under `key` only if it is still `record`.
    pub(crate) fn remove_if_same(&self, key: &Key, record: &Arc<ServiceRecord>) -> bool {
        let mut maps = self.maps.lock();
        match maps.services.get(key) {
            Some(current) if Arc::ptr_eq(current, record) => {
                maps.services.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Clears single-value records only; grouped records survive.
    pub(crate) fn clear(&self) {
        self.maps.lock().services.clear();
    }

    /// Records of the group under `key`, in registration order.
    pub(crate) fn grouped(&self, key: &Key) -> Option<Vec<Arc<ServiceRecord>>> {
        self.maps.lock().grouped.get(key).filter(|g| !g.is_empty()).cloned()
    }

    pub(crate) fn first_grouped(&self, key: &Key) -> Option<Arc<ServiceRecord>> {
        self.maps.lock().grouped.get(key).and_then(|g| g.first().cloned())
    }

    /// Snapshot of every record, single-value first, then groups.
    pub(crate) fn snapshot(&self) -> Vec<ServiceMetadata> {
        let maps = self.maps.lock();
        let singles = maps.services.values().map(|r| r.snapshot());
        let groups = maps.grouped.values().flat_map(|g| g.iter().map(|r| r.snapshot()));
        singles.chain(groups).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.maps.lock().services.len()
    }

    pub(crate) fn grouped_len(&self) -> usize {
        self.maps.lock().grouped.values().map(Vec::len).sum()
    }
}
