/*!
 * Raw Trap Primitive
 *
 * `syscallN` issues the platform trap with the number and exactly N
 * arguments bound to the registers the platform convention names. Registers
 * the compiler reserves for itself are moved by hand around the trap.
 * Returns the raw result register; negative values are `-errno` on Linux.
 */

#[cfg(target_arch = "x86_64")]
mod x86_64;
#[cfg(target_arch = "x86_64")]
pub use self::x86_64::*;

#[cfg(target_arch = "x86")]
mod x86;
#[cfg(target_arch = "x86")]
pub use self::x86::*;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "aarch64")]
pub use self::aarch64::*;

#[cfg(all(target_arch = "arm", target_feature = "thumb-mode"))]
mod arm;
#[cfg(all(target_arch = "arm", target_feature = "thumb-mode"))]
pub use self::arm::*;

#[cfg(all(target_arch = "arm", not(target_feature = "thumb-mode")))]
compile_error!("raw syscalls on 32-bit ARM require a Thumb target");

#[cfg(not(any(
    target_arch = "x86_64",
    target_arch = "x86",
    target_arch = "aarch64",
    target_arch = "arm"
)))]
compile_error!("raw syscalls are not implemented for this architecture");

/// Invoke `nr` with a runtime-sized argument list.
///
/// Dispatches to the matching `syscallN`; more than six arguments yields
/// `-EINVAL` without trapping.
///
/// # Safety
///
/// The caller is responsible for the meaning of `nr` under the ABI the
/// process currently runs with, and for every pointer passed in `args`.
#[inline(always)]
pub unsafe fn syscall(nr: usize, args: &[usize]) -> isize {
    match *args {
        [] => syscall0(nr),
        [a0] => syscall1(nr, a0),
        [a0, a1] => syscall2(nr, a0, a1),
        [a0, a1, a2] => syscall3(nr, a0, a1, a2),
        [a0, a1, a2, a3] => syscall4(nr, a0, a1, a2, a3),
        [a0, a1, a2, a3, a4] => syscall5(nr, a0, a1, a2, a3, a4),
        [a0, a1, a2, a3, a4, a5] => syscall6(nr, a0, a1, a2, a3, a4, a5),
        _ => -(nix::libc::EINVAL as isize),
    }
}
