/*!
 * Provider Table
 * Name and id lookup for registered providers
 *
 * Read on every dispatched syscall and written only when a provider is
 * registered, so readers get a lock-free snapshot and writers publish a
 * new one.
 */

use super::traits::{SyscallFn, SyscallProvider};
use super::types::{ProviderError, ProviderResult, SyscallRequest};
use crate::core::limits::NAME_MAX;
use crate::core::types::{HandlerId, ProcessKey};
use arc_swap::ArcSwap;
use nix::libc;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::info;

#[derive(Default, Clone)]
struct ProviderSet {
    by_name: HashMap<String, HandlerId>,
    by_id: BTreeMap<HandlerId, Arc<dyn SyscallProvider>>,
}

pub struct ProviderTable {
    current: ArcSwap<ProviderSet>,
    writer: Mutex<()>,
}

impl ProviderTable {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(ProviderSet::default()),
            writer: Mutex::new(()),
        }
    }

    /// Register a provider under its own name. Ids are handed out in
    /// registration order starting at 0.
    pub fn register(&self, provider: Arc<dyn SyscallProvider>) -> ProviderResult<HandlerId> {
        let name = provider.name().to_string();
        validate_name(&name)?;

        let _writer = self.writer.lock();
        let current = self.current.load();

        if current.by_name.contains_key(&name) {
            return Err(ProviderError::Duplicate(name));
        }

        let id = u32::try_from(current.by_id.len())
            .ok()
            .map(HandlerId::new)
            .filter(|id| !id.is_sentinel())
            .ok_or(ProviderError::Exhausted)?;

        let mut next = ProviderSet::clone(&current);
        next.by_name.insert(name.clone(), id);
        next.by_id.insert(id, provider);
        self.current.store(Arc::new(next));

        info!(provider = %name, handler = %id, "Provider registered");
        Ok(id)
    }

    pub fn resolve(&self, name: &str) -> Option<HandlerId> {
        self.current.load().by_name.get(name).copied()
    }

    pub fn get(&self, id: HandlerId) -> Option<Arc<dyn SyscallProvider>> {
        self.current.load().by_id.get(&id).cloned()
    }

    pub fn name_of(&self, id: HandlerId) -> Option<String> {
        self.current
            .load()
            .by_id
            .get(&id)
            .map(|provider| provider.name().to_string())
    }

    /// Registered names in id order
    pub fn names(&self) -> Vec<String> {
        self.current
            .load()
            .by_id
            .values()
            .map(|provider| provider.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.current.load().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ProviderTable {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> ProviderResult<()> {
    if name.is_empty() || name.len() >= NAME_MAX || name.contains('\0') {
        return Err(ProviderError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Provider backed by a syscall-number table. Unknown numbers return `-ENOSYS`.
pub struct TableProvider {
    name: String,
    table: HashMap<usize, SyscallFn>,
}

impl TableProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: HashMap::new(),
        }
    }

    pub fn with_syscall<F>(mut self, number: usize, handler: F) -> Self
    where
        F: Fn(ProcessKey, &SyscallRequest) -> isize + Send + Sync + 'static,
    {
        self.table.insert(number, Arc::new(handler));
        self
    }

    pub fn syscall_count(&self) -> usize {
        self.table.len()
    }
}

impl SyscallProvider for TableProvider {
    fn dispatch(&self, process: ProcessKey, request: &SyscallRequest) -> isize {
        match self.table.get(&request.number) {
            Some(handler) => handler(process, request),
            None => -(libc::ENOSYS as isize),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
