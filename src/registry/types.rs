/*!
 * Registry Types
 */

use crate::core::types::{HandlerId, ProcessKey};
use serde::{Deserialize, Serialize};

/// Handler bookkeeping for one tracked process.
///
/// `parent_handler` is only meaningful once `has_parent_handler` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessHandlerEntry {
    pub process: ProcessKey,
    pub current_handler: HandlerId,
    pub has_parent_handler: bool,
    pub has_internal_parent_handler: bool,
    pub parent_handler: HandlerId,
}

/// Shape of an entry, as seen by the switch protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "details", rename_all = "snake_case")]
pub enum HandlerState {
    Registered(HandlerId),
    Delegated {
        current: HandlerId,
        parent: HandlerId,
        internal: bool,
    },
}

impl ProcessHandlerEntry {
    pub fn new(process: ProcessKey, handler: HandlerId) -> Self {
        Self {
            process,
            current_handler: handler,
            has_parent_handler: false,
            has_internal_parent_handler: false,
            parent_handler: HandlerId::SENTINEL,
        }
    }

    /// Handler that owned the process before the handoff, if any
    #[inline]
    pub fn parent(&self) -> Option<HandlerId> {
        self.has_parent_handler.then_some(self.parent_handler)
    }

    pub fn state(&self) -> HandlerState {
        if self.has_parent_handler {
            HandlerState::Delegated {
                current: self.current_handler,
                parent: self.parent_handler,
                internal: self.has_internal_parent_handler,
            }
        } else {
            HandlerState::Registered(self.current_handler)
        }
    }

    /// Move ownership to `target`, recording the current owner as parent
    pub(super) fn delegate(&mut self, target: HandlerId, internal: bool) {
        self.parent_handler = self.current_handler;
        self.has_parent_handler = true;
        self.has_internal_parent_handler = internal;
        self.current_handler = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_registered() {
        let entry = ProcessHandlerEntry::new(ProcessKey(1), HandlerId(3));
        assert_eq!(entry.state(), HandlerState::Registered(HandlerId(3)));
        assert_eq!(entry.parent(), None);
    }

    #[test]
    fn test_delegate_records_parent() {
        let mut entry = ProcessHandlerEntry::new(ProcessKey(1), HandlerId(3));
        entry.delegate(HandlerId(5), true);
        assert_eq!(
            entry.state(),
            HandlerState::Delegated {
                current: HandlerId(5),
                parent: HandlerId(3),
                internal: true,
            }
        );
        assert_eq!(entry.parent(), Some(HandlerId(3)));
    }
}
