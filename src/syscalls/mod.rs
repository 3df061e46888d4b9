/*!
 * Raw Syscalls
 *
 * Register-exact trap primitive and a fail path built on it. Code that may
 * run on either side of a handoff uses nothing else: a library binding
 * bakes in one ABI's numbering and marshaling.
 */

pub mod fail;
pub mod numbers;
pub mod raw;

pub use fail::{fail, render_status};
pub use raw::{syscall, syscall0, syscall1, syscall2, syscall3, syscall4, syscall5, syscall6};

/// Invoke a syscall, binding only the registers that carry arguments.
///
/// Expands to a call of one of the `syscallN` functions, so it must be used
/// inside an `unsafe` block. Every argument is converted with `as usize`.
#[macro_export]
macro_rules! raw_syscall {
    ($nr:expr $(,)?) => {
        $crate::syscalls::raw::syscall0($nr as usize)
    };
    ($nr:expr, $a0:expr $(,)?) => {
        $crate::syscalls::raw::syscall1($nr as usize, $a0 as usize)
    };
    ($nr:expr, $a0:expr, $a1:expr $(,)?) => {
        $crate::syscalls::raw::syscall2($nr as usize, $a0 as usize, $a1 as usize)
    };
    ($nr:expr, $a0:expr, $a1:expr, $a2:expr $(,)?) => {
        $crate::syscalls::raw::syscall3($nr as usize, $a0 as usize, $a1 as usize, $a2 as usize)
    };
    ($nr:expr, $a0:expr, $a1:expr, $a2:expr, $a3:expr $(,)?) => {
        $crate::syscalls::raw::syscall4(
            $nr as usize,
            $a0 as usize,
            $a1 as usize,
            $a2 as usize,
            $a3 as usize,
        )
    };
    ($nr:expr, $a0:expr, $a1:expr, $a2:expr, $a3:expr, $a4:expr $(,)?) => {
        $crate::syscalls::raw::syscall5(
            $nr as usize,
            $a0 as usize,
            $a1 as usize,
            $a2 as usize,
            $a3 as usize,
            $a4 as usize,
        )
    };
    ($nr:expr, $a0:expr, $a1:expr, $a2:expr, $a3:expr, $a4:expr, $a5:expr $(,)?) => {
        $crate::syscalls::raw::syscall6(
            $nr as usize,
            $a0 as usize,
            $a1 as usize,
            $a2 as usize,
            $a3 as usize,
            $a4 as usize,
            $a5 as usize,
        )
    };
}
