/*!
 * Syscall Dispatcher
 * Routes each intercepted syscall to the provider that owns the caller
 */

use super::table::ProviderTable;
use super::types::SyscallRequest;
use crate::core::types::{HandlerId, ProcessKey};
use crate::registry::ProcessRegistry;
use nix::libc;
use std::sync::Arc;
use tracing::{trace, warn};

#[derive(Clone)]
pub struct SyscallDispatcher {
    registry: Arc<ProcessRegistry>,
    providers: Arc<ProviderTable>,
    host: HandlerId,
}

impl SyscallDispatcher {
    /// `host` serves every process the registry does not track
    pub fn new(
        registry: Arc<ProcessRegistry>,
        providers: Arc<ProviderTable>,
        host: HandlerId,
    ) -> Self {
        Self {
            registry,
            providers,
            host,
        }
    }

    /// Handler that would serve the next syscall of `process`
    pub fn route(&self, process: ProcessKey) -> HandlerId {
        self.registry.get_handler(process).unwrap_or(self.host)
    }

    pub fn dispatch(&self, process: ProcessKey, request: &SyscallRequest) -> isize {
        // The registry lock is released before the provider runs
        let handler = self.route(process);

        match self.providers.get(handler) {
            Some(provider) => {
                trace!(%process, %handler, number = request.number, "Dispatching syscall");
                provider.dispatch(process, request)
            }
            None => {
                warn!(%process, %handler, number = request.number, "No provider for handler");
                -(libc::ENOSYS as isize)
            }
        }
    }

    pub fn host(&self) -> HandlerId {
        self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::TableProvider;

    fn setup() -> (SyscallDispatcher, Arc<ProcessRegistry>, HandlerId) {
        let registry = Arc::new(ProcessRegistry::new());
        let providers = Arc::new(ProviderTable::new());
        let host = providers
            .register(Arc::new(TableProvider::new("host").with_syscall(1, |_, _| 100)))
            .unwrap();
        let monix = providers
            .register(Arc::new(TableProvider::new("Monix").with_syscall(1, |_, _| 200)))
            .unwrap();
        (
            SyscallDispatcher::new(Arc::clone(&registry), providers, host),
            registry,
            monix,
        )
    }

    #[test]
    fn test_untracked_process_goes_to_host() {
        let (dispatcher, _, _) = setup();
        assert_eq!(dispatcher.dispatch(ProcessKey(1), &SyscallRequest::new(1)), 100);
    }

    #[test]
    fn test_delegated_process_goes_to_target() {
        let (dispatcher, registry, monix) = setup();
        registry.switch_handler(ProcessKey(1), monix).unwrap();
        assert_eq!(dispatcher.route(ProcessKey(1)), monix);
        assert_eq!(dispatcher.dispatch(ProcessKey(1), &SyscallRequest::new(1)), 200);
    }

    #[test]
    fn test_unknown_handler() {
        let (dispatcher, registry, _) = setup();
        registry.register_handler(ProcessKey(2), HandlerId(42)).unwrap();
        assert_eq!(
            dispatcher.dispatch(ProcessKey(2), &SyscallRequest::new(1)),
            -(libc::ENOSYS as isize)
        );
    }
}
