/*!
 * Control Plane Tests
 * A process asks the control device for Monix and is served by it afterwards
 */

use handoff_kernel::device::SET_PROVIDER_IOCTL;
use handoff_kernel::loader::abi;
use handoff_kernel::syscalls::numbers::{SYS_GETPID, SYS_WRITE};
use handoff_kernel::{
    ControlError, Driver, DriverConfig, HandlerError, HandlerId, OpenMode, ProcessKey,
    ProviderName, SyscallRequest,
};
use nix::libc;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const GREETING: &[u8] = b"Hello, Monix World!\n";

fn load(dir: &TempDir) -> Driver {
    let mut config = DriverConfig::default();
    config.device.path = dir.path().join("reality");
    Driver::load(config).unwrap()
}

fn host_write(fd: usize, bytes: &[u8]) -> SyscallRequest {
    SyscallRequest::new(SYS_WRITE)
        .with_args(&[fd, 0, bytes.len()])
        .with_payload(bytes)
}

fn monix_write(fd: usize, bytes: &[u8]) -> SyscallRequest {
    SyscallRequest::new(abi::WRITE)
        .with_args(&[bytes.len(), 0, fd])
        .with_payload(bytes)
}

#[test]
fn test_monix_handoff_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let driver = load(&dir);
    let p = ProcessKey(1000);
    let dispatcher = driver.dispatcher();

    // Before the handoff the process speaks the host ABI
    let banner = b"Bootstrapping...\n";
    assert_eq!(dispatcher.dispatch(p, &host_write(1, banner)), banner.len() as isize);
    assert_eq!(dispatcher.dispatch(p, &SyscallRequest::new(SYS_GETPID)), 1000);

    let handle = driver.device().open(p, OpenMode::ReadOnly).unwrap();
    let name = ProviderName::new("Monix").unwrap();
    assert_eq!(handle.ioctl_status(SET_PROVIDER_IOCTL, name.as_bytes()), 0);

    let monix = driver.providers().resolve("Monix").unwrap();
    assert_eq!(dispatcher.route(p), monix);
    let entry = driver.registry().get_entry(p).unwrap();
    assert!(entry.has_parent_handler);
    assert!(!entry.has_internal_parent_handler);
    assert_eq!(entry.parent_handler, HandlerId::SENTINEL);

    // Afterwards the same trap numbers mean Monix calls
    assert_eq!(
        dispatcher.dispatch(p, &monix_write(1, GREETING)),
        GREETING.len() as isize
    );
    let exit = SyscallRequest::new(abi::EXIT).with_args(&[(-1isize) as usize]);
    assert_eq!(dispatcher.dispatch(p, &exit), 0);

    let mut expected = banner.to_vec();
    expected.extend_from_slice(GREETING);
    assert_eq!(driver.console().output(p), expected);
    assert_eq!(driver.console().exit_status(p), Some(-1));

    // A second request is refused and the numbering stays Monix
    assert_eq!(
        handle.ioctl(SET_PROVIDER_IOCTL, name.as_bytes()),
        Err(ControlError::Handler(HandlerError::NotImplemented {
            process: p,
            current: monix,
        }))
    );
    assert_eq!(
        handle.ioctl_status(SET_PROVIDER_IOCTL, name.as_bytes()),
        -(libc::ENOSYS as isize)
    );
    assert_eq!(dispatcher.route(p), monix);
    assert_eq!(driver.device().request_count(), 3);

    driver.on_process_exit(p);
    assert_eq!(dispatcher.route(p), dispatcher.host());
}

#[test]
fn test_failed_request_keeps_host_abi() {
    let dir = tempfile::tempdir().unwrap();
    let driver = load(&dir);
    let p = ProcessKey(5);
    let handle = driver.device().open(p, OpenMode::ReadOnly).unwrap();

    assert_eq!(
        handle.ioctl_status(SET_PROVIDER_IOCTL, b"Linux\0"),
        -(libc::ENOENT as isize)
    );
    assert_eq!(handle.ioctl_status(SET_PROVIDER_IOCTL, b"\0"), -(libc::EINVAL as isize));
    assert_eq!(handle.ioctl_status(0x1234, b"Monix\0"), -(libc::ENOTTY as isize));

    assert!(driver.registry().is_empty());
    assert_eq!(driver.dispatcher().dispatch(p, &host_write(2, b"x")), 1);
}

#[test]
fn test_writable_open_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let driver = load(&dir);

    for mode in [OpenMode::WriteOnly, OpenMode::ReadWrite] {
        let err = driver.device().open(ProcessKey(1), mode).err().unwrap();
        assert_eq!(err.status(), -(libc::EACCES as isize));
    }
}

#[test]
fn test_explicitly_registered_process_records_internal_parent() {
    let dir = tempfile::tempdir().unwrap();
    let driver = load(&dir);
    let p = ProcessKey(77);
    let host = driver.dispatcher().host();

    driver.registry().register_handler(p, host).unwrap();
    let handle = driver.device().open(p, OpenMode::ReadOnly).unwrap();
    handle
        .set_provider(&ProviderName::new("Monix").unwrap())
        .unwrap();

    let entry = driver.registry().get_entry(p).unwrap();
    assert!(entry.has_internal_parent_handler);
    assert_eq!(entry.parent_handler, host);
}
