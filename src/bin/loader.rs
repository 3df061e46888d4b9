/*!
 * Handoff Loader
 *
 * Bootstraps a container under the Monix provider. From the first step to
 * the last, every kernel interaction is a raw trap: once the handoff lands,
 * anything the standard library issues would be read with Monix numbering.
 */

use handoff_kernel::loader::{self, abi, BootstrapPlan};
use handoff_kernel::raw_syscall;
use handoff_kernel::syscalls::fail;
use handoff_kernel::syscalls::numbers::{STDOUT, SYS_EXIT, SYS_WRITE};

const GREETING: &[u8] = b"Hello, Monix World!\n";
const EXITED: &[u8] = b"Monix container exited.\n";

fn main() {
    let plan = BootstrapPlan::default();

    if let Err(failure) = loader::bootstrap(&plan) {
        fail(failure.message, failure.status);
    }

    unsafe {
        abi::write(1, GREETING);
        abi::exit(-1);

        // Control only comes back here if the provider returns us to the host
        raw_syscall!(SYS_WRITE, STDOUT, EXITED.as_ptr(), EXITED.len());
        loop {
            raw_syscall!(SYS_EXIT, 0);
        }
    }
}
