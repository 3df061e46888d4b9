/*!
 * Handler Switch Protocol
 * Hands a process off from its current handler to another one
 */

use super::manager::ProcessRegistry;
use super::types::ProcessHandlerEntry;
use crate::core::errors::{HandlerError, HandlerResult};
use crate::core::types::{HandlerId, ProcessKey};
use tracing::{info, warn};

impl ProcessRegistry {
    /// Move `process` to `target`, recording its current handler as parent.
    ///
    /// An untracked process is first registered under the sentinel handler;
    /// that scaffolding never survives the call. Returns the updated entry.
    pub fn switch_handler(
        &self,
        process: ProcessKey,
        target: HandlerId,
    ) -> HandlerResult<ProcessHandlerEntry> {
        if target.is_sentinel() {
            return Err(HandlerError::InvalidParameter(
                "cannot hand off to the sentinel handler".into(),
            ));
        }

        let mut store = self.store.lock();

        let implicit = !store.contains(&process);
        if implicit {
            store.insert(ProcessHandlerEntry::new(process, HandlerId::SENTINEL))?;
        }

        let admitted = match store.get(&process) {
            Some(entry) => self.policy.admit(entry, target),
            None => Err(HandlerError::NotFound(process)),
        };

        if let Err(err) = admitted {
            if implicit {
                store.remove(&process);
            }
            warn!(%process, %target, error = %err, "Handoff rejected");
            return Err(err);
        }

        let entry = store
            .get_mut(&process)
            .ok_or(HandlerError::NotFound(process))?;
        entry.delegate(target, !implicit);
        let entry = *entry;

        info!(
            %process,
            handler = %entry.current_handler,
            parent = %entry.parent_handler,
            internal = entry.has_internal_parent_handler,
            "Process handed off"
        );
        Ok(entry)
    }
}
