/*!
 * Control Device Types
 * Wire-level values shared by the driver and the loader
 */

use crate::core::errors::{ControlError, ControlResult};
use crate::core::limits::{
    CONTROL_IOCTL_TYPE, NAME_MAX, REALITY_DEVICE_PATH, REALITY_MAJOR, REALITY_MINOR, REALITY_MODE,
};
use nix::libc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Linux `_IOW(ty, nr, size)`
pub const fn ioctl_write_code(ty: u8, nr: u8, size: usize) -> u32 {
    const IOC_WRITE: u32 = 1;
    (IOC_WRITE << 30) | (((size as u32) & 0x3fff) << 16) | ((ty as u32) << 8) | nr as u32
}

/// "Set provider": payload is a NUL-padded `[u8; NAME_MAX]`
pub const SET_PROVIDER_IOCTL: u32 = ioctl_write_code(CONTROL_IOCTL_TYPE, 1, NAME_MAX);

/// Linux `makedev`
pub const fn makedev(major: u32, minor: u32) -> u64 {
    let major = major as u64;
    let minor = minor as u64;
    ((major & 0xffff_f000) << 32)
        | ((major & 0x0000_0fff) << 8)
        | ((minor & 0xffff_ff00) << 12)
        | (minor & 0x0000_00ff)
}

/// Provider name as carried by the control request
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProviderName([u8; NAME_MAX]);

impl ProviderName {
    /// Build a name at compile time. Panics if `name` does not leave room
    /// for the NUL terminator.
    pub const fn from_static(name: &str) -> Self {
        let bytes = name.as_bytes();
        assert!(bytes.len() < NAME_MAX, "provider name too long");

        let mut buf = [0u8; NAME_MAX];
        let mut i = 0;
        while i < bytes.len() {
            buf[i] = bytes[i];
            i += 1;
        }
        Self(buf)
    }

    pub fn new(name: &str) -> ControlResult<Self> {
        if name.is_empty() || name.len() >= NAME_MAX || name.contains('\0') {
            return Err(ControlError::InvalidName(name.to_string()));
        }
        Ok(Self::from_static(name))
    }

    /// Decode a control request payload. Shorter payloads are treated as
    /// NUL padded; longer ones are rejected.
    pub fn from_bytes(payload: &[u8]) -> ControlResult<Self> {
        if payload.len() > NAME_MAX {
            return Err(ControlError::InvalidName(format!(
                "payload of {} bytes exceeds {}",
                payload.len(),
                NAME_MAX
            )));
        }

        let mut buf = [0u8; NAME_MAX];
        buf[..payload.len()].copy_from_slice(payload);
        let name = Self(buf);
        name.as_str()?;
        Ok(name)
    }

    /// Bytes before the first NUL
    pub fn as_str(&self) -> ControlResult<&str> {
        let len = self
            .0
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| ControlError::InvalidName("missing NUL terminator".into()))?;

        if len == 0 {
            return Err(ControlError::InvalidName("empty name".into()));
        }

        std::str::from_utf8(&self.0[..len])
            .map_err(|_| ControlError::InvalidName("name is not UTF-8".into()))
    }

    /// Full padded buffer, as passed to the control request
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; NAME_MAX] {
        &self.0
    }
}

impl fmt::Debug for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Ok(name) => write!(f, "ProviderName({:?})", name),
            Err(_) => write!(f, "ProviderName({:?})", &self.0[..]),
        }
    }
}

/// How a process opened the control device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl OpenMode {
    pub fn from_flags(flags: i32) -> Self {
        match flags & libc::O_ACCMODE {
            libc::O_WRONLY => OpenMode::WriteOnly,
            libc::O_RDWR => OpenMode::ReadWrite,
            _ => OpenMode::ReadOnly,
        }
    }
}

/// Where and how the device node is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSpec {
    pub path: PathBuf,
    pub major: u32,
    pub minor: u32,
    pub mode: u32,
}

impl DeviceSpec {
    #[inline]
    pub fn dev(&self) -> u64 {
        makedev(self.major, self.minor)
    }
}

impl Default for DeviceSpec {
    fn default() -> Self {
        Self {
            path: PathBuf::from(REALITY_DEVICE_PATH),
            major: REALITY_MAJOR,
            minor: REALITY_MINOR,
            mode: REALITY_MODE,
        }
    }
}
