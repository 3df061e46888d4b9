/*!
 * Control Device
 * Kernel side of the "set provider" control request
 *
 * The device is read-only and exposes no data channel. Its only operation
 * is the control request, which drives `switch_handler` for the caller.
 */

use super::types::{DeviceSpec, OpenMode, ProviderName, SET_PROVIDER_IOCTL};
use crate::core::errors::{ControlError, ControlResult};
use crate::core::types::{HandlerId, ProcessKey};
use crate::providers::ProviderTable;
use crate::registry::ProcessRegistry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ControlDevice {
    spec: DeviceSpec,
    registry: Arc<ProcessRegistry>,
    providers: Arc<ProviderTable>,
    requests: AtomicU64,
}

impl ControlDevice {
    pub fn new(
        spec: DeviceSpec,
        registry: Arc<ProcessRegistry>,
        providers: Arc<ProviderTable>,
    ) -> Self {
        Self {
            spec,
            registry,
            providers,
            requests: AtomicU64::new(0),
        }
    }

    /// Open on behalf of `process`. Only read-only opens are allowed.
    pub fn open(&self, process: ProcessKey, mode: OpenMode) -> ControlResult<DeviceHandle<'_>> {
        if mode != OpenMode::ReadOnly {
            warn!(%process, ?mode, "Rejected writable open of control device");
            return Err(ControlError::PermissionDenied(format!(
                "{} opened {:?}",
                self.spec.path.display(),
                mode
            )));
        }

        debug!(%process, "Control device opened");
        Ok(DeviceHandle {
            device: self,
            process,
        })
    }

    pub fn spec(&self) -> &DeviceSpec {
        &self.spec
    }

    /// Control requests received since load
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

/// An open file description on the control device
pub struct DeviceHandle<'a> {
    device: &'a ControlDevice,
    process: ProcessKey,
}

impl DeviceHandle<'_> {
    /// Process that opened this handle
    pub fn process(&self) -> ProcessKey {
        self.process
    }

    pub fn ioctl(&self, code: u32, payload: &[u8]) -> ControlResult<()> {
        self.device.requests.fetch_add(1, Ordering::Relaxed);

        match code {
            SET_PROVIDER_IOCTL => {
                let name = ProviderName::from_bytes(payload)?;
                self.set_provider(&name).map(|_| ())
            }
            other => Err(ControlError::InvalidRequest(other)),
        }
    }

    /// `ioctl` with the result in the raw convention: 0 or a negated errno
    pub fn ioctl_status(&self, code: u32, payload: &[u8]) -> isize {
        match self.ioctl(code, payload) {
            Ok(()) => 0,
            Err(err) => err.status(),
        }
    }

    /// Hand the calling process off to the provider called `name`
    pub fn set_provider(&self, name: &ProviderName) -> ControlResult<HandlerId> {
        let name = name.as_str()?;
        let target = self
            .device
            .providers
            .resolve(name)
            .ok_or_else(|| ControlError::UnknownProvider(name.to_string()))?;

        let entry = self.device.registry.switch_handler(self.process, target)?;

        info!(
            process = %self.process,
            provider = name,
            handler = %target,
            parent = %entry.parent_handler,
            "Provider set through control device"
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::HandlerError;
    use crate::providers::TableProvider;

    fn device() -> (ControlDevice, Arc<ProcessRegistry>, HandlerId) {
        let registry = Arc::new(ProcessRegistry::new());
        let providers = Arc::new(ProviderTable::new());
        providers.register(Arc::new(TableProvider::new("host"))).unwrap();
        let monix = providers.register(Arc::new(TableProvider::new("Monix"))).unwrap();
        (
            ControlDevice::new(DeviceSpec::default(), Arc::clone(&registry), providers),
            registry,
            monix,
        )
    }

    #[test]
    fn test_writable_open_rejected() {
        let (device, _, _) = device();
        assert!(matches!(
            device.open(ProcessKey(1), OpenMode::ReadWrite),
            Err(ControlError::PermissionDenied(_))
        ));
        assert!(device.open(ProcessKey(1), OpenMode::ReadOnly).is_ok());
    }

    #[test]
    fn test_set_provider_switches_caller() {
        let (device, registry, monix) = device();
        let handle = device.open(ProcessKey(5), OpenMode::ReadOnly).unwrap();
        let name = ProviderName::new("Monix").unwrap();

        assert_eq!(handle.ioctl(SET_PROVIDER_IOCTL, name.as_bytes()), Ok(()));
        assert_eq!(registry.get_handler(ProcessKey(5)).unwrap(), monix);
        assert_eq!(device.request_count(), 1);
    }

    #[test]
    fn test_unknown_provider_leaves_mapping() {
        let (device, registry, _) = device();
        let handle = device.open(ProcessKey(5), OpenMode::ReadOnly).unwrap();

        let err = handle.ioctl(SET_PROVIDER_IOCTL, b"Nope").unwrap_err();
        assert_eq!(err, ControlError::UnknownProvider("Nope".into()));
        assert!(registry.get_entry(ProcessKey(5)).is_err());
    }

    #[test]
    fn test_unknown_code() {
        let (device, _, _) = device();
        let handle = device.open(ProcessKey(5), OpenMode::ReadOnly).unwrap();
        assert_eq!(
            handle.ioctl(0xdead, b"Monix"),
            Err(ControlError::InvalidRequest(0xdead))
        );
    }

    #[test]
    fn test_second_request_reports_not_implemented() {
        let (device, _, monix) = device();
        let handle = device.open(ProcessKey(5), OpenMode::ReadOnly).unwrap();
        handle.ioctl(SET_PROVIDER_IOCTL, b"Monix").unwrap();

        let err = handle.ioctl(SET_PROVIDER_IOCTL, b"host").unwrap_err();
        assert_eq!(
            err,
            ControlError::Handler(HandlerError::NotImplemented {
                process: ProcessKey(5),
                current: monix,
            })
        );
    }
}
