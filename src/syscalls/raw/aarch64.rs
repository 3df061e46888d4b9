/*!
 * AArch64 Trap
 *
 * `svc 0`. Number in x8, arguments in x0..x5, result in x0.
 */

use core::arch::asm;

#[inline(always)]
pub unsafe fn syscall0(nr: usize) -> isize {
    let ret: usize;
    asm!(
        "svc 0",
        in("x8") nr,
        lateout("x0") ret,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall1(nr: usize, a0: usize) -> isize {
    let ret: usize;
    asm!(
        "svc 0",
        in("x8") nr,
        inlateout("x0") a0 => ret,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall2(nr: usize, a0: usize, a1: usize) -> isize {
    let ret: usize;
    asm!(
        "svc 0",
        in("x8") nr,
        inlateout("x0") a0 => ret,
        in("x1") a1,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall3(nr: usize, a0: usize, a1: usize, a2: usize) -> isize {
    let ret: usize;
    asm!(
        "svc 0",
        in("x8") nr,
        inlateout("x0") a0 => ret,
        in("x1") a1,
        in("x2") a2,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall4(nr: usize, a0: usize, a1: usize, a2: usize, a3: usize) -> isize {
    let ret: usize;
    asm!(
        "svc 0",
        in("x8") nr,
        inlateout("x0") a0 => ret,
        in("x1") a1,
        in("x2") a2,
        in("x3") a3,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall5(
    nr: usize,
    a0: usize,
    a1: usize,
    a2: usize,
    a3: usize,
    a4: usize,
) -> isize {
    let ret: usize;
    asm!(
        "svc 0",
        in("x8") nr,
        inlateout("x0") a0 => ret,
        in("x1") a1,
        in("x2") a2,
        in("x3") a3,
        in("x4") a4,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall6(
    nr: usize,
    a0: usize,
    a1: usize,
    a2: usize,
    a3: usize,
    a4: usize,
    a5: usize,
) -> isize {
    let ret: usize;
    asm!(
        "svc 0",
        in("x8") nr,
        inlateout("x0") a0 => ret,
        in("x1") a1,
        in("x2") a2,
        in("x3") a3,
        in("x4") a4,
        in("x5") a5,
        options(nostack, preserves_flags)
    );
    ret as isize
}
