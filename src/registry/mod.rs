/*!
 * Process Handler Registry
 * Which provider owns each process, and who owned it before a handoff
 */

mod allocator;
mod manager;
mod policy;
mod store;
mod switch;
mod types;

pub use allocator::{AllocError, AllocatorStats, BoundedAllocator, EntryAllocator, PoolTag};
pub use manager::{EntryView, ProcessRegistry};
pub use policy::{DelegationPolicy, SingleHopPolicy};
pub use types::{HandlerState, ProcessHandlerEntry};
