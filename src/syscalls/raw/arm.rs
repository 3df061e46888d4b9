/*!
 * ARM Thumb Trap
 *
 * Thumb `svc 0`. Number in r7, arguments in r0..r5, result in r0.
 *
 * r7 is the Thumb frame pointer and cannot be an operand, so the number is
 * staged through a scratch register and r7 is restored after the trap.
 */

use core::arch::asm;

#[inline(always)]
pub unsafe fn syscall0(nr: usize) -> isize {
    let ret: usize;
    asm!(
        "mov {tmp}, r7",
        "mov r7, {nr}",
        "svc 0",
        "mov r7, {tmp}",
        nr = in(reg) nr,
        tmp = out(reg) _,
        lateout("r0") ret,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall1(nr: usize, a0: usize) -> isize {
    let ret: usize;
    asm!(
        "mov {tmp}, r7",
        "mov r7, {nr}",
        "svc 0",
        "mov r7, {tmp}",
        nr = in(reg) nr,
        tmp = out(reg) _,
        inlateout("r0") a0 => ret,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall2(nr: usize, a0: usize, a1: usize) -> isize {
    let ret: usize;
    asm!(
        "mov {tmp}, r7",
        "mov r7, {nr}",
        "svc 0",
        "mov r7, {tmp}",
        nr = in(reg) nr,
        tmp = out(reg) _,
        inlateout("r0") a0 => ret,
        in("r1") a1,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall3(nr: usize, a0: usize, a1: usize, a2: usize) -> isize {
    let ret: usize;
    asm!(
        "mov {tmp}, r7",
        "mov r7, {nr}",
        "svc 0",
        "mov r7, {tmp}",
        nr = in(reg) nr,
        tmp = out(reg) _,
        inlateout("r0") a0 => ret,
        in("r1") a1,
        in("r2") a2,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall4(nr: usize, a0: usize, a1: usize, a2: usize, a3: usize) -> isize {
    let ret: usize;
    asm!(
        "mov {tmp}, r7",
        "mov r7, {nr}",
        "svc 0",
        "mov r7, {tmp}",
        nr = in(reg) nr,
        tmp = out(reg) _,
        inlateout("r0") a0 => ret,
        in("r1") a1,
        in("r2") a2,
        in("r3") a3,
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
        "mov {tmp}, r7",
        "mov r7, {nr}",
        "svc 0",
        "mov r7, {tmp}",
        nr = in(reg) nr,
        tmp = out(reg) _,
        inlateout("r0") a0 => ret,
        in("r1") a1,
        in("r2") a2,
        in("r3") a3,
        in("r4") a4,
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
        "mov {tmp}, r7",
        "mov r7, {nr}",
        "svc 0",
        "mov r7, {tmp}",
        nr = in(reg) nr,
        tmp = out(reg) _,
        inlateout("r0") a0 => ret,
        in("r1") a1,
        in("r2") a2,
        in("r3") a3,
        in("r4") a4,
        in("r5") a5,
        options(nostack, preserves_flags)
    );
    ret as isize
}
