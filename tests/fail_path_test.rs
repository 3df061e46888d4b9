/*!
 * Fail Path Tests
 * Fatal exits run in a re-executed copy of this test binary
 */

use handoff_kernel::loader::{self, BootstrapPlan};
use handoff_kernel::syscalls::fail;
use nix::libc;
use pretty_assertions::assert_eq;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::process::{Command, Output};

const CHILD_VAR: &str = "HANDOFF_FAIL_CHILD";
const DEVICE_VAR: &str = "HANDOFF_FAIL_DEVICE";

/// Re-run only `test` in a child with `mode` set, and collect its output
fn rerun(test: &str, mode: &str, device: Option<&Path>) -> Output {
    let exe = std::env::current_exe().unwrap();
    let mut command = Command::new(exe);
    command
        .args([test, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_VAR, mode);
    if let Some(device) = device {
        command.env(DEVICE_VAR, device);
    }
    command.output().unwrap()
}

fn child_mode() -> Option<String> {
    std::env::var(CHILD_VAR).ok()
}

#[test]
fn test_fail_writes_status_and_exits() {
    if child_mode().as_deref() == Some("fail") {
        fail(b"msg", -13);
    }

    let output = rerun("test_fail_writes_status_and_exits", "fail", None);
    assert_eq!(output.stderr, b"msg: 13\n");
    assert_eq!(output.status.code(), Some(13));
}

#[test]
fn test_fail_with_zero_status_exits_cleanly() {
    if child_mode().as_deref() == Some("zero") {
        fail(b"done", 0);
    }

    let output = rerun("test_fail_with_zero_status_exits_cleanly", "zero", None);
    assert_eq!(output.stderr, b"done: 0\n");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_bootstrap_failure_reports_and_exits() {
    if child_mode().as_deref() == Some("bootstrap") {
        let device = std::env::var_os(DEVICE_VAR).unwrap();
        let device_path = CString::new(device.as_bytes()).unwrap();
        let plan = BootstrapPlan {
            device_path: &device_path,
            ..BootstrapPlan::default()
        };
        if let Err(failure) = loader::bootstrap(&plan) {
            fail(failure.message, failure.status);
        }
        unreachable!("bootstrap cannot succeed without the device directory");
    }

    let dir = tempfile::tempdir().unwrap();
    let device = dir.path().join("missing").join("reality");
    let output = rerun("test_bootstrap_failure_reports_and_exits", "bootstrap", Some(&device));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Bootstrapping the container with Monix loader...\n"));
    assert_eq!(
        output.stderr,
        format!("Cannot create the reality device: {}\n", libc::ENOENT).into_bytes()
    );
    assert_eq!(output.status.code(), Some(libc::ENOENT));
    assert!(!device.exists());
}
