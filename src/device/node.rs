/*!
 * Device Node Creation
 */

use super::types::DeviceSpec;
use crate::core::errors::{KernelError, Result};
use nix::errno::Errno;
use nix::libc;
use nix::sys::stat::{mknod, Mode, SFlag};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Created,
    AlreadyExists,
}

/// Create the character device node. A node that already exists is success.
pub fn create_device_node(spec: &DeviceSpec) -> Result<NodeStatus> {
    let mode = Mode::from_bits_truncate(spec.mode as libc::mode_t);

    match mknod(spec.path.as_path(), SFlag::S_IFCHR, mode, spec.dev() as libc::dev_t) {
        Ok(()) => {
            info!(path = %spec.path.display(), major = spec.major, minor = spec.minor, "Device node created");
            Ok(NodeStatus::Created)
        }
        Err(Errno::EEXIST) => {
            debug!(path = %spec.path.display(), "Device node already exists");
            Ok(NodeStatus::AlreadyExists)
        }
        Err(errno) => Err(KernelError::Io(format!(
            "cannot create {}: {}",
            spec.path.display(),
            errno.desc()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_node_is_not_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let spec = DeviceSpec {
            path: file.path().to_path_buf(),
            ..DeviceSpec::default()
        };
        assert_eq!(create_device_node(&spec).unwrap(), NodeStatus::AlreadyExists);
    }

    #[test]
    fn test_missing_parent_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let spec = DeviceSpec {
            path: dir.path().join("missing").join("reality"),
            ..DeviceSpec::default()
        };
        assert!(matches!(create_device_node(&spec), Err(KernelError::Io(_))));
    }
}
