/*!
 * Monix ABI
 *
 * Numbering and argument order of the provider the loader hands off to.
 * Read and write take `(size, buffer, fd)`, the reverse of Linux.
 */

use crate::syscalls::raw::{syscall1, syscall3};

pub const EXIT: usize = 0;
pub const READ: usize = 1;
pub const WRITE: usize = 2;

/// # Safety
///
/// The calling process must currently be handled by the Monix provider.
/// Under the host numbering these values mean something else entirely.
#[inline(always)]
pub unsafe fn write(fd: usize, buf: &[u8]) -> isize {
    syscall3(WRITE, buf.len(), buf.as_ptr() as usize, fd)
}

/// Returns only if the provider hands the process back to its parent.
///
/// # Safety
///
/// Same contract as [`write`].
#[inline(always)]
pub unsafe fn exit(code: isize) -> isize {
    syscall1(EXIT, code as usize)
}
