/*!
 * Core Types
 * Identity types shared by the registry, the control plane and dispatch
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a host process.
///
/// Assigned by the environment (a pid, a process-object sequence number)
/// and only ever compared. The registry never dereferences it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessKey(pub u64);

impl ProcessKey {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u32> for ProcessKey {
    fn from(pid: u32) -> Self {
        Self(pid as u64)
    }
}

impl fmt::Display for ProcessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a registered syscall provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerId(pub u32);

impl HandlerId {
    /// "No concrete provider yet". Only ever present while an implicit
    /// registration is being turned into a handoff.
    pub const SENTINEL: HandlerId = HandlerId(u32::MAX);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn is_sentinel(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            write!(f, "<sentinel>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
