//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Identity of the registry a key is produced in.
pub(crate) type RegistryId = usize;

// (registry, key) pairs currently being produced on this thread, outermost first
thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<(RegistryId, Key)>> = RefCell::new(Vec::new());
}

/// Marks a key as "being produced" in one registry on the current thread
/// until dropped.
pub(crate) struct ResolutionGuard {
    _private: (),
}

impl ResolutionGuard {
    /// Pushes `key` of `registry` onto the thread-local stack.
    ///
    /// Fails with `Circular` when the same key of the same registry is
    /// already on the stack and `detect_cycles` is on, and with
    /// `DepthExceeded` once the stack holds `max_depth` entries. The same key
    /// in another registry is not a cycle. Nothing is pushed on failure.
    pub(crate) fn enter(registry: RegistryId, key: &Key, detect_cycles: bool, max_depth: usize) -> DiResult<Self> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            let is_entry = |entry: &(RegistryId, Key)| entry.0 == registry && entry.1 == *key;

            if detect_cycles && stack.iter().any(|entry| is_entry(entry)) {
                let mut path: Vec<String> = stack
                    .iter()
                    .skip_while(|entry| !is_entry(*entry))
                    .map(|(_, k)| k.to_string())
                    .collect();
                path.push(key.to_string());
                return Err(DiError::Circular(path));
            }

            if stack.len() >= max_depth {
                return Err(DiError::DepthExceeded(stack.len()));
            }

            stack.push((registry, key.clone()));
            Ok(Self { _private: () })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Current nesting depth on this thread.
#[cfg(test)]
pub(crate) fn depth() -> usize {
    RESOLUTION_STACK.with(|stack| stack.borrow().len())
}
