/*!
 * Provider Traits
 */

use super::types::SyscallRequest;
use crate::core::types::ProcessKey;
use std::sync::Arc;

/// A syscall ABI able to own processes.
///
/// Returns follow the raw convention: non-negative on success, a negated
/// errno on failure.
pub trait SyscallProvider: Send + Sync {
    fn dispatch(&self, process: ProcessKey, request: &SyscallRequest) -> isize;

    /// Name used in "set provider" control requests
    fn name(&self) -> &str;
}

/// Implementation of a single syscall number
pub type SyscallFn = Arc<dyn Fn(ProcessKey, &SyscallRequest) -> isize + Send + Sync>;
