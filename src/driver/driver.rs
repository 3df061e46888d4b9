/*!
 * Driver
 *
 * Owns the registry, provider table, control device and dispatch path for
 * the lifetime of the host. Loading wires them together; unloading tears
 * the registry down explicitly.
 */

use super::config::DriverConfig;
use crate::core::errors::{HandlerError, KernelError, Result};
use crate::core::types::{HandlerId, ProcessKey};
use crate::device::{create_device_node, ControlDevice, NodeStatus};
use crate::monitoring::span_operation;
use crate::providers::{
    builtin, host_provider, Console, ProviderTable, SyscallDispatcher, SyscallProvider,
};
use crate::registry::{BoundedAllocator, ProcessHandlerEntry, ProcessRegistry};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Driver {
    config: DriverConfig,
    registry: Arc<ProcessRegistry>,
    providers: Arc<ProviderTable>,
    console: Arc<Console>,
    device: ControlDevice,
    dispatcher: SyscallDispatcher,
    node: Option<NodeStatus>,
}

impl Driver {
    /// Build every component and create the device node.
    ///
    /// A node that cannot be created is logged and left absent, so the
    /// driver still runs without the privilege to call mknod.
    pub fn load(config: DriverConfig) -> Result<Self> {
        let span = span_operation("driver_load");
        let _guard = span.enter();

        config.validate()?;

        let allocator = Arc::new(BoundedAllocator::new(config.max_tracked_processes));
        let registry = Arc::new(ProcessRegistry::with_allocator(allocator));
        let providers = Arc::new(ProviderTable::new());
        let console = Arc::new(Console::new());

        let host = providers.register(Arc::new(host_provider(
            &config.host_provider,
            Arc::clone(&console),
        )))?;

        for name in &config.providers {
            let provider = builtin(name, &console).ok_or_else(|| {
                KernelError::Configuration(format!("no built-in provider named {}", name))
            })?;
            providers.register(Arc::new(provider))?;
        }

        let dispatcher = SyscallDispatcher::new(Arc::clone(&registry), Arc::clone(&providers), host);
        let device = ControlDevice::new(
            config.device.clone(),
            Arc::clone(&registry),
            Arc::clone(&providers),
        );

        let node = match create_device_node(&config.device) {
            Ok(status) => Some(status),
            Err(err) => {
                warn!(
                    path = %config.device.path.display(),
                    error = %err,
                    "Control device node unavailable"
                );
                None
            }
        };

        span.record_items(providers.len());
        span.record_result(true);
        info!(
            host = %host,
            providers = ?providers.names(),
            policy = registry.policy_name(),
            node = ?node,
            "Driver loaded"
        );

        Ok(Self {
            config,
            registry,
            providers,
            console,
            device,
            dispatcher,
            node,
        })
    }

    /// Register an extra provider after load
    pub fn register_provider(&self, provider: Arc<dyn SyscallProvider>) -> Result<HandlerId> {
        let name = provider.name().to_string();
        let id = self.providers.register(provider)?;
        info!(provider = %name, handler = %id, "Provider registered");
        Ok(id)
    }

    /// Forget a process that has exited, along with its console history.
    /// Untracked processes are ignored.
    pub fn on_process_exit(&self, process: ProcessKey) -> Option<ProcessHandlerEntry> {
        let dropped = self.console.forget(process);
        if dropped > 0 {
            debug!(%process, writes = dropped, "Dropped console history");
        }

        match self.registry.unregister(process) {
            Ok(entry) => Some(entry),
            Err(HandlerError::NotFound(_)) => {
                debug!(%process, "Exit of untracked process");
                None
            }
            Err(err) => {
                warn!(%process, error = %err, "Failed to unregister exited process");
                None
            }
        }
    }

    /// Drop every registry entry, returning what was tracked
    pub fn unload(&self) -> Vec<ProcessHandlerEntry> {
        let span = span_operation("driver_unload");
        let _guard = span.enter();

        let drained = self.registry.clear();
        for entry in &drained {
            debug!(
                process = %entry.process,
                handler = %entry.current_handler,
                parent = %entry.parent_handler,
                "Dropped tracked process"
            );
        }

        span.record_items(drained.len());
        span.record_result(true);
        info!(
            drained = drained.len(),
            requests = self.device.request_count(),
            "Driver unloaded"
        );
        drained
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ProcessRegistry> {
        &self.registry
    }

    pub fn providers(&self) -> &Arc<ProviderTable> {
        &self.providers
    }

    pub fn console(&self) -> &Arc<Console> {
        &self.console
    }

    pub fn device(&self) -> &ControlDevice {
        &self.device
    }

    pub fn dispatcher(&self) -> &SyscallDispatcher {
        &self.dispatcher
    }

    /// Outcome of device node creation, if it succeeded
    pub fn node_status(&self) -> Option<NodeStatus> {
        self.node
    }
}
