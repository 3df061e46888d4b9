/*!
 * Syscall Providers
 * Named syscall ABIs and the per-syscall dispatch path
 */

mod builtin;
mod dispatcher;
mod table;
mod traits;
mod types;

pub use builtin::{builtin, host_provider, monix_provider, Console, ConsoleRecord, MONIX_PROVIDER};
pub use dispatcher::SyscallDispatcher;
pub use table::{ProviderTable, TableProvider};
pub use traits::{SyscallFn, SyscallProvider};
pub use types::{ProviderError, ProviderResult, SyscallRequest};
