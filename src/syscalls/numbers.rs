/*!
 * Host Syscall Numbers
 * Linux numbering for the current target, as register-sized values
 */

use nix::libc;

pub const SYS_READ: usize = libc::SYS_read as usize;
pub const SYS_WRITE: usize = libc::SYS_write as usize;
pub const SYS_EXIT: usize = libc::SYS_exit as usize;
pub const SYS_GETPID: usize = libc::SYS_getpid as usize;
pub const SYS_OPENAT: usize = libc::SYS_openat as usize;
pub const SYS_CLOSE: usize = libc::SYS_close as usize;
pub const SYS_MKNODAT: usize = libc::SYS_mknodat as usize;
pub const SYS_CHROOT: usize = libc::SYS_chroot as usize;
pub const SYS_CHDIR: usize = libc::SYS_chdir as usize;
pub const SYS_IOCTL: usize = libc::SYS_ioctl as usize;

/// `AT_FDCWD` sign-extended to register width
pub const AT_FDCWD: usize = libc::AT_FDCWD as isize as usize;

pub const STDOUT: usize = 1;
pub const STDERR: usize = 2;
