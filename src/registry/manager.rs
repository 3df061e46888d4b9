/*!
 * Process Registry
 * Lock-serialized registry service: register, query, unregister, clear
 *
 * Every public operation takes the registry lock for its full duration.
 * Nothing here calls out to another subsystem while the lock is held.
 */

use super::allocator::{AllocatorStats, BoundedAllocator, EntryAllocator};
use super::policy::{DelegationPolicy, SingleHopPolicy};
use super::store::HandlerStore;
use super::types::ProcessHandlerEntry;
use crate::core::errors::{HandlerError, HandlerResult};
use crate::core::types::{HandlerId, ProcessKey};
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, info};

/// Read-only view of an entry. Holds the registry lock until dropped.
pub struct EntryView<'a> {
    guard: MappedMutexGuard<'a, ProcessHandlerEntry>,
}

impl Deref for EntryView<'_> {
    type Target = ProcessHandlerEntry;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

pub struct ProcessRegistry {
    pub(super) store: Mutex<HandlerStore>,
    pub(super) policy: Arc<dyn DelegationPolicy>,
}

impl ProcessRegistry {
    /// Create a registry with the default bounded pool and single-hop policy
    pub fn new() -> Self {
        Self::with_allocator(Arc::new(BoundedAllocator::default()))
    }

    pub fn with_allocator(allocator: Arc<dyn EntryAllocator>) -> Self {
        Self::with_parts(allocator, Arc::new(SingleHopPolicy))
    }

    pub fn with_parts(
        allocator: Arc<dyn EntryAllocator>,
        policy: Arc<dyn DelegationPolicy>,
    ) -> Self {
        info!(policy = policy.name(), "Process registry initialized");
        Self {
            store: Mutex::new(HandlerStore::new(allocator)),
            policy,
        }
    }

    /// Look up an entry in place.
    ///
    /// The registry stays locked while the returned view is alive; drop it
    /// before calling any other registry operation on the same thread.
    pub fn lookup(&self, process: ProcessKey) -> Option<EntryView<'_>> {
        MutexGuard::try_map(self.store.lock(), |store| store.get_mut(&process))
            .ok()
            .map(|guard| EntryView { guard })
    }

    /// Track `process` as owned by `handler`
    pub fn register_handler(&self, process: ProcessKey, handler: HandlerId) -> HandlerResult<()> {
        if handler.is_sentinel() {
            return Err(HandlerError::InvalidParameter(
                "the sentinel handler cannot be registered".into(),
            ));
        }

        let mut store = self.store.lock();
        store.insert(ProcessHandlerEntry::new(process, handler))?;
        debug!(%process, %handler, tracked = store.len(), "Process registered");
        Ok(())
    }

    pub fn get_handler(&self, process: ProcessKey) -> HandlerResult<HandlerId> {
        self.store
            .lock()
            .get(&process)
            .map(|entry| entry.current_handler)
            .ok_or(HandlerError::NotFound(process))
    }

    /// Copy of the full entry
    pub fn get_entry(&self, process: ProcessKey) -> HandlerResult<ProcessHandlerEntry> {
        self.store
            .lock()
            .get(&process)
            .copied()
            .ok_or(HandlerError::NotFound(process))
    }

    /// False both when the process is untracked and when it belongs elsewhere
    pub fn belongs_to_handler(&self, process: ProcessKey, handler: HandlerId) -> bool {
        self.store
            .lock()
            .get(&process)
            .is_some_and(|entry| entry.current_handler == handler)
    }

    /// Stop tracking `process`, returning its last entry
    pub fn unregister(&self, process: ProcessKey) -> HandlerResult<ProcessHandlerEntry> {
        let mut store = self.store.lock();
        let entry = store
            .remove(&process)
            .ok_or(HandlerError::NotFound(process))?;
        debug!(%process, handler = %entry.current_handler, "Process unregistered");
        Ok(entry)
    }

    /// Drop every entry. Returns what was drained, in key order.
    pub fn clear(&self) -> Vec<ProcessHandlerEntry> {
        let drained = self.store.lock().drain();
        info!(drained = drained.len(), "Process registry cleared");
        drained
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies of all entries, in key order
    pub fn snapshot(&self) -> Vec<ProcessHandlerEntry> {
        self.store.lock().entries().copied().collect()
    }

    pub fn allocator_stats(&self) -> AllocatorStats {
        self.store.lock().allocator().stats()
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let registry = ProcessRegistry::new();
        registry.register_handler(ProcessKey(10), HandlerId(1)).unwrap();

        assert_eq!(registry.get_handler(ProcessKey(10)).unwrap(), HandlerId(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_rejects_sentinel() {
        let registry = ProcessRegistry::new();
        let err = registry
            .register_handler(ProcessKey(10), HandlerId::SENTINEL)
            .unwrap_err();
        assert!(matches!(err, HandlerError::InvalidParameter(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_view() {
        let registry = ProcessRegistry::new();
        registry.register_handler(ProcessKey(3), HandlerId(2)).unwrap();

        {
            let view = registry.lookup(ProcessKey(3)).unwrap();
            assert_eq!(view.current_handler, HandlerId(2));
            assert!(registry.store.try_lock().is_none());
        }

        assert!(registry.store.try_lock().is_some());
        assert!(registry.lookup(ProcessKey(4)).is_none());
        // A miss must not leave the lock held
        assert!(registry.store.try_lock().is_some());
    }

    #[test]
    fn test_belongs_to_handler() {
        let registry = ProcessRegistry::new();
        assert!(!registry.belongs_to_handler(ProcessKey(1), HandlerId(1)));

        registry.register_handler(ProcessKey(1), HandlerId(1)).unwrap();
        assert!(registry.belongs_to_handler(ProcessKey(1), HandlerId(1)));
        assert!(!registry.belongs_to_handler(ProcessKey(1), HandlerId(2)));
    }

    #[test]
    fn test_clear_releases_pool() {
        let registry = ProcessRegistry::new();
        for pid in 0..5u32 {
            registry.register_handler(pid.into(), HandlerId(0)).unwrap();
        }
        assert_eq!(registry.allocator_stats().live, 5);

        let drained = registry.clear();
        assert_eq!(drained.len(), 5);
        assert!(registry.is_empty());
        assert_eq!(registry.allocator_stats().live, 0);
        assert_eq!(registry.allocator_stats().peak, 5);
    }
}
