/*!
 * Control Device
 * Read-only device through which a process asks to be handed off
 */

mod control;
mod node;
mod types;

pub use control::{ControlDevice, DeviceHandle};
pub use node::{create_device_node, NodeStatus};
pub use types::{
    ioctl_write_code, makedev, DeviceSpec, OpenMode, ProviderName, SET_PROVIDER_IOCTL,
};
