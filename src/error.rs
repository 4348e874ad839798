//! Unified error types for the controller.
//!
//! A single `Error` enum that every port error converts into, keeping the
//! top-level run loop's error handling uniform.  Every variant is fatal:
//! the run stops and the operator is told why.

use core::fmt;

use crate::app::ports::{DeviceError, InputError, PersistError};
use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The serial link to the device could not be opened.
    Connection { port: String, reason: String },
    /// A toggle command could not be sent mid-run.
    Device(DeviceError),
    /// The transition table could not be written to disk.
    Persistence(PersistError),
    /// The operator input source failed or was closed.
    Input(InputError),
    /// Run parameters are invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection { port, reason } => write!(f, "connection to {port} failed: {reason}"),
            Self::Device(e) => write!(f, "device: {e}"),
            Self::Persistence(e) => write!(f, "persistence: {e}"),
            Self::Input(e) => write!(f, "input: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Self::Device(e)
    }
}

impl From<PersistError> for Error {
    fn from(e: PersistError) -> Self {
        Self::Persistence(e)
    }
}

impl From<InputError> for Error {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, Error>;
