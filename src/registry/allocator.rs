/*!
 * Registry Node Allocation
 * Tagged, bounded accounting for registry nodes
 */

use crate::core::limits::{DEFAULT_MAX_TRACKED_PROCESSES, REGISTRY_POOL_TAG};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use thiserror::Error;

/// Four-byte tag every allocation is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolTag(pub [u8; 4]);

impl PoolTag {
    pub const REGISTRY: PoolTag = PoolTag(REGISTRY_POOL_TAG);
}

impl fmt::Display for PoolTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            if byte.is_ascii_graphic() {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{:02x}", byte)?;
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("pool '{tag}' exhausted ({live}/{limit} nodes live)")]
pub struct AllocError {
    pub tag: PoolTag,
    pub live: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorStats {
    pub tag: PoolTag,
    pub live: usize,
    pub peak: usize,
    pub bytes: usize,
    pub failures: u64,
}

/// Backing allocation for registry nodes.
///
/// Called with the registry lock held, so implementations must not block.
pub trait EntryAllocator: Send + Sync {
    /// Charge one node of `size` bytes to `tag`
    fn allocate(&self, tag: PoolTag, size: usize) -> Result<(), AllocError>;

    /// Return a node previously charged with `allocate`
    fn release(&self, tag: PoolTag, size: usize);

    fn stats(&self) -> AllocatorStats;
}

/// Allocator with a fixed node budget
pub struct BoundedAllocator {
    tag: PoolTag,
    limit: usize,
    live: AtomicUsize,
    peak: AtomicUsize,
    bytes: AtomicUsize,
    failures: AtomicU64,
}

impl BoundedAllocator {
    pub fn new(limit: usize) -> Self {
        Self {
            tag: PoolTag::REGISTRY,
            limit,
            live: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            bytes: AtomicUsize::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for BoundedAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRACKED_PROCESSES)
    }
}

impl EntryAllocator for BoundedAllocator {
    fn allocate(&self, tag: PoolTag, size: usize) -> Result<(), AllocError> {
        let reserved = self
            .live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                (live < self.limit).then_some(live + 1)
            });
        let live = match reserved {
            Ok(previous) => previous + 1,
            Err(live) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                return Err(AllocError {
                    tag,
                    live,
                    limit: self.limit,
                });
            }
        };

        self.bytes.fetch_add(size, Ordering::Relaxed);
        self.peak.fetch_max(live, Ordering::Relaxed);
        Ok(())
    }

    fn release(&self, _tag: PoolTag, size: usize) {
        self.live.fetch_sub(1, Ordering::AcqRel);
        self.bytes.fetch_sub(size, Ordering::Relaxed);
    }

    fn stats(&self) -> AllocatorStats {
        AllocatorStats {
            tag: self.tag,
            live: self.live.load(Ordering::Acquire),
            peak: self.peak.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}
