/*!
 * Fail Path
 * Report a fatal status and terminate using only the raw primitive
 */

use super::numbers::{STDERR, SYS_EXIT, SYS_WRITE};
use super::raw::{syscall1, syscall3};
use crate::core::limits::STATUS_LINE_MAX;

/// Render `": <-status>\n"` into `buf`, returning the used length.
///
/// Digits are produced by hand; no formatting machinery is touched.
pub fn render_status(status: isize, buf: &mut [u8; STATUS_LINE_MAX]) -> usize {
    buf[0] = b':';
    buf[1] = b' ';
    let mut len = 2;

    let negated = status.wrapping_neg();
    if negated < 0 {
        buf[len] = b'-';
        len += 1;
    }

    let mut value = negated.unsigned_abs();
    let mut digits = [0u8; 20];
    let mut count = 0;
    loop {
        digits[count] = b'0' + (value % 10) as u8;
        value /= 10;
        count += 1;
        if value == 0 {
            break;
        }
    }

    while count > 0 {
        count -= 1;
        buf[len] = digits[count];
        len += 1;
    }

    buf[len] = b'\n';
    len + 1
}

/// Write `message` and the status line to stderr, then exit with `-status`.
///
/// Uses host numbering, so after a successful handoff this is only safe once
/// the provider has handed the process back.
pub fn fail(message: &[u8], status: isize) -> ! {
    let mut line = [0u8; STATUS_LINE_MAX];
    let len = render_status(status, &mut line);
    let code = status.wrapping_neg() as usize;

    unsafe {
        syscall3(SYS_WRITE, STDERR, message.as_ptr() as usize, message.len());
        syscall3(SYS_WRITE, STDERR, line.as_ptr() as usize, len);
    }

    loop {
        unsafe {
            syscall1(SYS_EXIT, code);
        }
    }
}
