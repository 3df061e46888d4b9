/*!
 * Driver Configuration
 *
 * Defaults, then the JSON file named by `KERNEL_CONFIG`, then individual
 * `KERNEL_*` overrides.
 */

use crate::core::errors::{KernelError, Result};
use crate::core::limits::{DEFAULT_HOST_PROVIDER, DEFAULT_MAX_TRACKED_PROCESSES};
use crate::device::DeviceSpec;
use crate::providers::MONIX_PROVIDER;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_VAR: &str = "KERNEL_CONFIG";
pub const DEVICE_PATH_VAR: &str = "KERNEL_DEVICE_PATH";
pub const PROVIDERS_VAR: &str = "KERNEL_PROVIDERS";
pub const MAX_TRACKED_VAR: &str = "KERNEL_MAX_TRACKED_PROCESSES";
pub const TRACE_JSON_VAR: &str = "KERNEL_TRACE_JSON";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub device: DeviceSpec,
    /// Serves every process with no registry entry. Always registered first.
    pub host_provider: String,
    /// Built-in providers a process may ask to be handed off to
    pub providers: Vec<String>,
    pub max_tracked_processes: usize,
    pub trace_json: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            device: DeviceSpec::default(),
            host_provider: DEFAULT_HOST_PROVIDER.to_string(),
            providers: vec![MONIX_PROVIDER.to_string()],
            max_tracked_processes: DEFAULT_MAX_TRACKED_PROCESSES,
            trace_json: false,
        }
    }
}

impl DriverConfig {
    /// Resolve the configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an explicit variable lookup
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_FILE_VAR) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            KernelError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = serde_json::from_str(&raw).map_err(|e| {
            KernelError::Configuration(format!("cannot parse {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(DEVICE_PATH_VAR) {
            self.device.path = PathBuf::from(path);
        }

        if let Some(list) = lookup(PROVIDERS_VAR) {
            self.providers = list
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(value) = lookup(MAX_TRACKED_VAR) {
            self.max_tracked_processes = value.trim().parse().map_err(|_| {
                KernelError::Configuration(format!("{}={:?} is not a count", MAX_TRACKED_VAR, value))
            })?;
        }

        if let Some(value) = lookup(TRACE_JSON_VAR) {
            self.trace_json = parse_flag(TRACE_JSON_VAR, &value)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tracked_processes == 0 {
            return Err(KernelError::Configuration(
                "max_tracked_processes must be at least 1".into(),
            ));
        }
        if self.providers.iter().any(|name| *name == self.host_provider) {
            return Err(KernelError::Configuration(format!(
                "{} is both the host provider and a handoff target",
                self.host_provider
            )));
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        other => Err(KernelError::Configuration(format!(
            "{}={:?} is not a boolean",
            key, other
        ))),
    }
}
