/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{HandlerId, ProcessKey};
use miette::Diagnostic;
use nix::libc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export ProviderError from providers module
pub use crate::providers::ProviderError;

/// Registry and switch protocol errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum HandlerError {
    #[error("Process {0} already has a handler")]
    #[diagnostic(
        code(registry::already_registered),
        help("Registration never overwrites. Unregister the process first.")
    )]
    AlreadyRegistered(ProcessKey),

    #[error("Process {0} is not tracked")]
    #[diagnostic(
        code(registry::not_found),
        help("The process may have exited or was never registered.")
    )]
    NotFound(ProcessKey),

    #[error("Insufficient resources: {0}")]
    #[diagnostic(
        code(registry::insufficient_resources),
        help("The registry pool is exhausted. The caller may retry after processes exit.")
    )]
    InsufficientResources(String),

    #[error("Invalid parameter: {0}")]
    #[diagnostic(code(registry::invalid_parameter))]
    InvalidParameter(String),

    #[error("Process {process} was already delegated to handler {current}")]
    #[diagnostic(
        code(registry::not_implemented),
        help("Only a single level of delegation is supported.")
    )]
    NotImplemented {
        process: ProcessKey,
        current: HandlerId,
    },
}

impl HandlerError {
    /// Negated errno reported to user processes
    pub fn status(&self) -> isize {
        let errno = match self {
            HandlerError::AlreadyRegistered(_) => libc::EEXIST,
            HandlerError::NotFound(_) => libc::ENOENT,
            HandlerError::InsufficientResources(_) => libc::ENOMEM,
            HandlerError::InvalidParameter(_) => libc::EINVAL,
            HandlerError::NotImplemented { .. } => libc::ENOSYS,
        };
        -(errno as isize)
    }
}

/// Control device errors surfaced to the requesting process
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ControlError {
    #[error("Permission denied: {0}")]
    #[diagnostic(
        code(control::permission_denied),
        help("The control device can only be opened read-only.")
    )]
    PermissionDenied(String),

    #[error("Unsupported control request {0:#x}")]
    #[diagnostic(code(control::invalid_request))]
    InvalidRequest(u32),

    #[error("Invalid provider name: {0}")]
    #[diagnostic(
        code(control::invalid_name),
        help("Provider names are non-empty UTF-8, NUL padded to NAME_MAX bytes.")
    )]
    InvalidName(String),

    #[error("Unknown provider: {0}")]
    #[diagnostic(
        code(control::unknown_provider),
        help("The provider must be registered with the driver before a handoff.")
    )]
    UnknownProvider(String),

    #[error("Handoff rejected: {0}")]
    #[diagnostic(transparent)]
    Handler(#[from] HandlerError),
}

impl ControlError {
    /// Negated errno reported through the control request
    pub fn status(&self) -> isize {
        let errno = match self {
            ControlError::PermissionDenied(_) => libc::EACCES,
            ControlError::InvalidRequest(_) => libc::ENOTTY,
            ControlError::InvalidName(_) => libc::EINVAL,
            ControlError::UnknownProvider(_) => libc::ENOENT,
            ControlError::Handler(err) => return err.status(),
        };
        -(errno as isize)
    }
}

/// Unified driver error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum KernelError {
    #[error("Handler error: {0}")]
    #[diagnostic(transparent)]
    Handler(#[from] HandlerError),

    #[error("Control error: {0}")]
    #[diagnostic(transparent)]
    Control(#[from] ControlError),

    #[error("Provider error: {0}")]
    #[diagnostic(transparent)]
    Provider(#[from] ProviderError),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(kernel::io_error),
        help("Filesystem or I/O operation failed. Check file permissions.")
    )]
    Io(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(kernel::configuration_error),
        help("Invalid configuration. Review KERNEL_* variables and the KERNEL_CONFIG file.")
    )]
    Configuration(String),
}

impl From<std::io::Error> for KernelError {
    fn from(err: std::io::Error) -> Self {
        KernelError::Io(err.to_string())
    }
}

impl From<nix::Error> for KernelError {
    fn from(err: nix::Error) -> Self {
        KernelError::Io(err.desc().to_string())
    }
}

/// Result type for registry operations
pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// Result type for control device operations
pub type ControlResult<T> = std::result::Result<T, ControlError>;

/// Result type for driver operations
pub type Result<T> = std::result::Result<T, KernelError>;
