/*!
 * Bootstrap
 * Create and open the control device, enter the new root, request a handoff
 */

use crate::core::limits::{REALITY_MAJOR, REALITY_MINOR, REALITY_MODE};
use crate::device::{makedev, ProviderName, SET_PROVIDER_IOCTL};
use crate::syscalls::numbers::{
    AT_FDCWD, STDOUT, SYS_CHDIR, SYS_CHROOT, SYS_IOCTL, SYS_MKNODAT, SYS_OPENAT, SYS_WRITE,
};
use crate::syscalls::raw::{syscall1, syscall3, syscall4};
use nix::libc;
use std::ffi::CStr;
use std::os::fd::RawFd;

/// Everything the loader needs, as NUL-terminated paths and raw values
#[derive(Debug, Clone, Copy)]
pub struct BootstrapPlan<'a> {
    pub banner: &'a [u8],
    pub device_path: &'a CStr,
    pub device: u64,
    pub mode: u32,
    pub new_root: &'a CStr,
    pub provider: ProviderName,
}

pub const DEFAULT_PLAN: BootstrapPlan<'static> = BootstrapPlan {
    banner: b"Bootstrapping the container with Monix loader...\n",
    device_path: c"/dev/reality",
    device: makedev(REALITY_MAJOR, REALITY_MINOR),
    mode: REALITY_MODE,
    new_root: c"/rootfs/",
    provider: ProviderName::from_static("Monix"),
};

impl Default for BootstrapPlan<'static> {
    fn default() -> Self {
        DEFAULT_PLAN
    }
}

/// A failed step: what to print and the raw negative status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapFailure {
    pub message: &'static [u8],
    pub status: isize,
}

impl BootstrapFailure {
    fn check(status: isize, message: &'static [u8]) -> Result<isize, Self> {
        if status < 0 {
            Err(Self { message, status })
        } else {
            Ok(status)
        }
    }
}

pub fn announce(banner: &[u8]) -> Result<(), BootstrapFailure> {
    let status = unsafe { syscall3(SYS_WRITE, STDOUT, banner.as_ptr() as usize, banner.len()) };
    BootstrapFailure::check(status, b"Cannot write the banner").map(|_| ())
}

/// Create the device node (an existing node is fine) and open it read-only
pub fn open_device(plan: &BootstrapPlan<'_>) -> Result<RawFd, BootstrapFailure> {
    let mode = libc::S_IFCHR as usize | plan.mode as usize;
    let status = unsafe {
        syscall4(
            SYS_MKNODAT,
            AT_FDCWD,
            plan.device_path.as_ptr() as usize,
            mode,
            plan.device as usize,
        )
    };
    if status != -(libc::EEXIST as isize) {
        BootstrapFailure::check(status, b"Cannot create the reality device")?;
    }

    let status = unsafe {
        syscall3(
            SYS_OPENAT,
            AT_FDCWD,
            plan.device_path.as_ptr() as usize,
            libc::O_RDONLY as usize,
        )
    };
    let fd = BootstrapFailure::check(status, b"Cannot open the reality device")?;
    Ok(fd as RawFd)
}

/// Change root and move to its top. Open descriptors survive.
pub fn enter_root(plan: &BootstrapPlan<'_>) -> Result<(), BootstrapFailure> {
    let status = unsafe { syscall1(SYS_CHROOT, plan.new_root.as_ptr() as usize) };
    BootstrapFailure::check(status, b"Cannot change root")?;

    let status = unsafe { syscall1(SYS_CHDIR, c"/".as_ptr() as usize) };
    BootstrapFailure::check(status, b"Cannot change directory")?;
    Ok(())
}

/// Ask the driver behind `fd` to hand this process to `provider`.
///
/// On success the very next trap is interpreted by the new provider.
pub fn request_handoff(fd: RawFd, provider: &ProviderName) -> Result<(), BootstrapFailure> {
    let status = unsafe {
        syscall3(
            SYS_IOCTL,
            fd as usize,
            SET_PROVIDER_IOCTL as usize,
            provider.as_bytes().as_ptr() as usize,
        )
    };
    BootstrapFailure::check(status, b"Cannot set the provider name")?;
    Ok(())
}

/// Run every step in order, stopping at the first failure.
/// Returns the control device descriptor, still open.
pub fn bootstrap(plan: &BootstrapPlan<'_>) -> Result<RawFd, BootstrapFailure> {
    announce(plan.banner)?;
    let fd = open_device(plan)?;
    enter_root(plan)?;
    request_handoff(fd, &plan.provider)?;
    Ok(fd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan() {
        let plan = BootstrapPlan::default();
        assert_eq!(plan.device_path.to_bytes(), b"/dev/reality");
        assert_eq!(plan.new_root.to_bytes(), b"/rootfs/");
        assert_eq!(plan.provider.as_str().unwrap(), "Monix");
        assert_eq!(plan.mode, 0o444);
        assert_eq!(plan.device, makedev(10, REALITY_MINOR));
    }

    #[test]
    fn test_check_passes_non_negative() {
        assert_eq!(BootstrapFailure::check(3, b"x"), Ok(3));
        assert_eq!(
            BootstrapFailure::check(-2, b"x"),
            Err(BootstrapFailure {
                message: b"x",
                status: -2
            })
        );
    }
}
