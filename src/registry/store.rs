/*!
 * Registry Backing Store
 * Ordered map of process entries with tagged node accounting
 *
 * Not synchronized. Every caller goes through the registry lock.
 */

use super::allocator::{EntryAllocator, PoolTag};
use super::types::ProcessHandlerEntry;
use crate::core::errors::{HandlerError, HandlerResult};
use crate::core::types::ProcessKey;
use std::collections::BTreeMap;
use std::mem;
use std::sync::Arc;

const NODE_SIZE: usize = mem::size_of::<(ProcessKey, ProcessHandlerEntry)>();

pub(super) struct HandlerStore {
    nodes: BTreeMap<ProcessKey, ProcessHandlerEntry>,
    allocator: Arc<dyn EntryAllocator>,
    tag: PoolTag,
}

impl HandlerStore {
    pub(super) fn new(allocator: Arc<dyn EntryAllocator>) -> Self {
        Self {
            nodes: BTreeMap::new(),
            allocator,
            tag: PoolTag::REGISTRY,
        }
    }

    /// Insert a fresh entry. Never overwrites.
    pub(super) fn insert(&mut self, entry: ProcessHandlerEntry) -> HandlerResult<()> {
        if self.nodes.contains_key(&entry.process) {
            return Err(HandlerError::AlreadyRegistered(entry.process));
        }

        self.allocator
            .allocate(self.tag, NODE_SIZE)
            .map_err(|e| HandlerError::InsufficientResources(e.to_string()))?;

        self.nodes.insert(entry.process, entry);
        Ok(())
    }

    #[inline]
    pub(super) fn get(&self, key: &ProcessKey) -> Option<&ProcessHandlerEntry> {
        self.nodes.get(key)
    }

    #[inline]
    pub(super) fn get_mut(&mut self, key: &ProcessKey) -> Option<&mut ProcessHandlerEntry> {
        self.nodes.get_mut(key)
    }

    #[inline]
    pub(super) fn contains(&self, key: &ProcessKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub(super) fn remove(&mut self, key: &ProcessKey) -> Option<ProcessHandlerEntry> {
        let entry = self.nodes.remove(key)?;
        self.allocator.release(self.tag, NODE_SIZE);
        Some(entry)
    }

    /// Enumerate and delete every node, in key order
    pub(super) fn drain(&mut self) -> Vec<ProcessHandlerEntry> {
        let nodes = mem::take(&mut self.nodes);
        nodes
            .into_values()
            .inspect(|_| self.allocator.release(self.tag, NODE_SIZE))
            .collect()
    }

    #[inline]
    pub(super) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(super) fn entries(&self) -> impl Iterator<Item = &ProcessHandlerEntry> {
        self.nodes.values()
    }

    pub(super) fn allocator(&self) -> &Arc<dyn EntryAllocator> {
        &self.allocator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::HandlerId;
    use crate::registry::allocator::BoundedAllocator;

    fn store(limit: usize) -> HandlerStore {
        HandlerStore::new(Arc::new(BoundedAllocator::new(limit)))
    }

    #[test]
    fn test_insert_never_overwrites() {
        let mut store = store(8);
        store
            .insert(ProcessHandlerEntry::new(ProcessKey(1), HandlerId(1)))
            .unwrap();

        let err = store
            .insert(ProcessHandlerEntry::new(ProcessKey(1), HandlerId(2)))
            .unwrap_err();
        assert_eq!(err, HandlerError::AlreadyRegistered(ProcessKey(1)));
        assert_eq!(store.get(&ProcessKey(1)).unwrap().current_handler, HandlerId(1));
    }

    #[test]
    fn test_duplicate_does_not_charge_allocator() {
        let mut store = store(1);
        store
            .insert(ProcessHandlerEntry::new(ProcessKey(1), HandlerId(1)))
            .unwrap();

        // Full pool, but the duplicate check wins
        let err = store
            .insert(ProcessHandlerEntry::new(ProcessKey(1), HandlerId(1)))
            .unwrap_err();
        assert!(matches!(err, HandlerError::AlreadyRegistered(_)));

        let err = store
            .insert(ProcessHandlerEntry::new(ProcessKey(2), HandlerId(1)))
            .unwrap_err();
        assert!(matches!(err, HandlerError::InsufficientResources(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_drain_releases_every_node() {
        let mut store = store(8);
        for key in [5, 3, 9] {
            store
                .insert(ProcessHandlerEntry::new(ProcessKey(key), HandlerId(0)))
                .unwrap();
        }

        let drained: Vec<u64> = store.drain().iter().map(|e| e.process.raw()).collect();
        assert_eq!(drained, vec![3, 5, 9]);
        assert_eq!(store.len(), 0);
        assert_eq!(store.allocator().stats().live, 0);
    }
}
