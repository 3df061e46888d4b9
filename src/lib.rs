/*!
 * Handoff Kernel Library
 *
 * Per-process syscall handler tracking, the handoff protocol between
 * handlers, the control device that drives it and the raw syscall
 * primitive used by loaders on both sides of a handoff.
 */

pub mod core;
pub mod device;
pub mod driver;
pub mod loader;
pub mod monitoring;
pub mod providers;
pub mod registry;
pub mod syscalls;

// Re-exports
pub use crate::core::{
    ControlError, ControlResult, HandlerError, HandlerId, HandlerResult, KernelError, ProcessKey,
    Result,
};
pub use device::{ControlDevice, DeviceHandle, DeviceSpec, OpenMode, ProviderName};
pub use driver::{Driver, DriverConfig};
pub use monitoring::init_tracing;
pub use providers::{ProviderTable, SyscallDispatcher, SyscallProvider, SyscallRequest};
pub use registry::{DelegationPolicy, ProcessHandlerEntry, ProcessRegistry, SingleHopPolicy};
