/*!
 * Built-in Providers
 *
 * Model ABIs served by the driver host. Both record what processes write
 * and how they exit in a shared console instead of touching real
 * descriptors.
 */

use super::table::TableProvider;
use super::types::SyscallRequest;
use crate::core::types::ProcessKey;
use crate::loader::abi;
use crate::syscalls::numbers::{SYS_EXIT, SYS_GETPID, SYS_READ, SYS_WRITE};
use nix::libc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

pub const MONIX_PROVIDER: &str = "Monix";

/// One captured write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleRecord {
    pub process: ProcessKey,
    pub fd: usize,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct Console {
    records: Mutex<Vec<ConsoleRecord>>,
    exits: Mutex<BTreeMap<ProcessKey, isize>>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `size` bytes of `request.payload` written to `fd`
    fn write(&self, process: ProcessKey, fd: usize, size: usize, request: &SyscallRequest) -> isize {
        if fd != 1 && fd != 2 {
            return -(libc::EBADF as isize);
        }
        let Some(bytes) = request.payload.get(..size) else {
            return -(libc::EFAULT as isize);
        };

        self.records.lock().push(ConsoleRecord {
            process,
            fd,
            bytes: bytes.to_vec(),
        });
        size as isize
    }

    /// No input is ever queued, so stdin reads hit end of file
    fn read(&self, fd: usize) -> isize {
        if fd == 0 {
            0
        } else {
            -(libc::EBADF as isize)
        }
    }

    fn exit(&self, process: ProcessKey, code: isize) -> isize {
        debug!(%process, code, "Process exited");
        self.exits.lock().insert(process, code);
        0
    }

    /// Everything `process` wrote, concatenated in order
    pub fn output(&self, process: ProcessKey) -> Vec<u8> {
        self.records
            .lock()
            .iter()
            .filter(|record| record.process == process)
            .flat_map(|record| record.bytes.iter().copied())
            .collect()
    }

    pub fn records(&self) -> Vec<ConsoleRecord> {
        self.records.lock().clone()
    }

    pub fn exit_status(&self, process: ProcessKey) -> Option<isize> {
        self.exits.lock().get(&process).copied()
    }

    /// Drop everything recorded for `process`, returning how many writes went
    pub fn forget(&self, process: ProcessKey) -> usize {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|record| record.process != process);
        self.exits.lock().remove(&process);
        before - records.len()
    }
}

/// Linux numbering for the current target: `write(fd, buf, count)`,
/// `read(fd, buf, count)`, `exit(code)`, `getpid()`
pub fn host_provider(name: &str, console: Arc<Console>) -> TableProvider {
    let on_write = Arc::clone(&console);
    let on_read = Arc::clone(&console);
    TableProvider::new(name)
        .with_syscall(SYS_WRITE, move |process, req| {
            on_write.write(process, req.arg(0), req.arg(2), req)
        })
        .with_syscall(SYS_READ, move |_, req| on_read.read(req.arg(0)))
        .with_syscall(SYS_EXIT, move |process, req| {
            console.exit(process, req.arg(0) as isize)
        })
        .with_syscall(SYS_GETPID, |process, _| process.raw() as isize)
}

/// Monix numbering: `exit(code)`, `read(size, buf, fd)`, `write(size, buf, fd)`
pub fn monix_provider(console: Arc<Console>) -> TableProvider {
    let on_write = Arc::clone(&console);
    let on_read = Arc::clone(&console);
    TableProvider::new(MONIX_PROVIDER)
        .with_syscall(abi::WRITE, move |process, req| {
            on_write.write(process, req.arg(2), req.arg(0), req)
        })
        .with_syscall(abi::READ, move |_, req| on_read.read(req.arg(2)))
        .with_syscall(abi::EXIT, move |process, req| {
            console.exit(process, req.arg(0) as isize)
        })
}

/// Built-in provider registered under `name`, if there is one
pub fn builtin(name: &str, console: &Arc<Console>) -> Option<TableProvider> {
    match name {
        MONIX_PROVIDER => Some(monix_provider(Arc::clone(console))),
        _ => None,
    }
}
