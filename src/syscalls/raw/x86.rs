/*!
 * x86 Trap
 *
 * `int 0x80`. Number in eax, arguments in ebx, ecx, edx, esi, edi, ebp.
 *
 * esi and ebp are reserved by the compiler, so they are swapped in by hand
 * and restored before the block ends.
 */

use core::arch::asm;

#[inline(always)]
pub unsafe fn syscall0(nr: usize) -> isize {
    let ret: usize;
    asm!(
        "int 0x80",
        inlateout("eax") nr => ret,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall1(nr: usize, a0: usize) -> isize {
    let ret: usize;
    asm!(
        "int 0x80",
        inlateout("eax") nr => ret,
        in("ebx") a0,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall2(nr: usize, a0: usize, a1: usize) -> isize {
    let ret: usize;
    asm!(
        "int 0x80",
        inlateout("eax") nr => ret,
        in("ebx") a0,
        in("ecx") a1,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall3(nr: usize, a0: usize, a1: usize, a2: usize) -> isize {
    let ret: usize;
    asm!(
        "int 0x80",
        inlateout("eax") nr => ret,
        in("ebx") a0,
        in("ecx") a1,
        in("edx") a2,
        options(nostack, preserves_flags)
    );
    ret as isize
}

#[inline(always)]
pub unsafe fn syscall4(nr: usize, a0: usize, a1: usize, a2: usize, a3: usize) -> isize {
    let ret: usize;
    // The second xchg puts a3 back in its register; the kernel preserves esi.
    asm!(
        "xchg esi, {a3}",
        "int 0x80",
        "xchg esi, {a3}",
        a3 = in(reg) a3,
        inlateout("eax") nr => ret,
        in("ebx") a0,
        in("ecx") a1,
        in("edx") a2,
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
        "xchg esi, {a3}",
        "int 0x80",
        "xchg esi, {a3}",
        a3 = in(reg) a3,
        inlateout("eax") nr => ret,
        in("ebx") a0,
        in("ecx") a1,
        in("edx") a2,
        in("edi") a4,
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
    // Out of free registers: esi, ebp and the number travel through memory.
    let spill = [a3, a5, nr];
    let ret: usize;
    asm!(
        "push ebp",
        "push esi",
        "mov esi, dword ptr [eax]",
        "mov ebp, dword ptr [eax + 4]",
        "mov eax, dword ptr [eax + 8]",
        "int 0x80",
        "pop esi",
        "pop ebp",
        inlateout("eax") spill.as_ptr() as usize => ret,
        in("ebx") a0,
        in("ecx") a1,
        in("edx") a2,
        in("edi") a4,
        options(preserves_flags)
    );
    ret as isize
}
