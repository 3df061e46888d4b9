/*!
 * Delegation Policy
 * Decides whether an entry may be handed off again
 */

use super::types::ProcessHandlerEntry;
use crate::core::errors::{HandlerError, HandlerResult};
use crate::core::types::HandlerId;

/// Consulted by `switch_handler` with the registry lock held.
///
/// The store records only the immediate parent, so a policy that admits a
/// second handoff replaces the recorded parent.
pub trait DelegationPolicy: Send + Sync {
    fn admit(&self, entry: &ProcessHandlerEntry, target: HandlerId) -> HandlerResult<()>;

    fn name(&self) -> &'static str;
}

/// One handoff per process lifetime
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleHopPolicy;

impl DelegationPolicy for SingleHopPolicy {
    fn admit(&self, entry: &ProcessHandlerEntry, _target: HandlerId) -> HandlerResult<()> {
        if entry.has_parent_handler {
            return Err(HandlerError::NotImplemented {
                process: entry.process,
                current: entry.current_handler,
            });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "single-hop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ProcessKey;

    #[test]
    fn test_single_hop_rejects_delegated_entry() {
        let mut entry = ProcessHandlerEntry::new(ProcessKey(1), HandlerId(1));
        assert!(SingleHopPolicy.admit(&entry, HandlerId(2)).is_ok());

        entry.delegate(HandlerId(2), true);
        let err = SingleHopPolicy.admit(&entry, HandlerId(3)).unwrap_err();
        assert_eq!(
            err,
            HandlerError::NotImplemented {
                process: ProcessKey(1),
                current: HandlerId(2),
            }
        );
    }
}
