/*!
 * Provider Types
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ProviderError {
    #[error("Provider already registered: {0}")]
    #[diagnostic(code(provider::duplicate))]
    Duplicate(String),

    #[error("Invalid provider name: {0}")]
    #[diagnostic(
        code(provider::invalid_name),
        help("Names must be non-empty, contain no NUL byte and fit in NAME_MAX - 1 bytes.")
    )]
    InvalidName(String),

    #[error("Provider id space exhausted")]
    #[diagnostic(code(provider::exhausted))]
    Exhausted,
}

/// One intercepted syscall, as the trap left it: a number and six
/// register-sized arguments.
///
/// `payload` holds the user buffer the call references, copied in by the
/// interception layer; providers never dereference argument addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyscallRequest {
    pub number: usize,
    pub args: [usize; 6],
    #[serde(default)]
    pub payload: Vec<u8>,
}

impl SyscallRequest {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            args: [0; 6],
            payload: Vec::new(),
        }
    }

    /// Fill the leading argument slots. Extra values beyond six are ignored.
    pub fn with_args(mut self, args: &[usize]) -> Self {
        for (slot, value) in self.args.iter_mut().zip(args) {
            *slot = *value;
        }
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    #[inline]
    pub fn arg(&self, index: usize) -> usize {
        self.args.get(index).copied().unwrap_or(0)
    }
}
