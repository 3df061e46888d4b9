/*!
 * System Limits and Constants
 *
 * Fixed values shared by the kernel-side driver and the loader.
 * Both sides must agree on every value in this file.
 */

// =============================================================================
// PROVIDER NAMES
// =============================================================================

/// Size of the NUL-padded provider name carried by the control request.
/// A name can use at most `NAME_MAX - 1` bytes.
pub const NAME_MAX: usize = 32;

/// Name under which the host's own syscall table is registered
pub const DEFAULT_HOST_PROVIDER: &str = "host";

// =============================================================================
// CONTROL DEVICE
// =============================================================================

/// Path of the control device node
pub const REALITY_DEVICE_PATH: &str = "/dev/reality";

/// Misc character device major
pub const REALITY_MAJOR: u32 = 10;

/// Minor reserved for the control device
pub const REALITY_MINOR: u32 = 243;

/// Owner, group and other may read. Nobody may write.
pub const REALITY_MODE: u32 = 0o444;

/// Type byte of the control request codes
pub const CONTROL_IOCTL_TYPE: u8 = b'R';

// =============================================================================
// REGISTRY
// =============================================================================

/// Default bound on tracked processes before registration reports
/// `InsufficientResources`
pub const DEFAULT_MAX_TRACKED_PROCESSES: usize = 65_536;

/// Pool tag charged for registry nodes
pub const REGISTRY_POOL_TAG: [u8; 4] = *b"PMAP";

// =============================================================================
// LOADER
// =============================================================================

/// Root the loader switches into before the handoff
pub const LOADER_NEW_ROOT: &str = "/rootfs/";

/// Capacity of the status line rendered by the fail path (": " + digits + "\n")
pub const STATUS_LINE_MAX: usize = 32;
