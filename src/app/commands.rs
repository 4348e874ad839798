//! Inbound operator commands.
//!
//! The keyboard adapter hands raw key bytes to the core; this module decides
//! which of them mean something.

/// Commands the operator can issue while the loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    /// Flip the device now and restart the schedule from this instant.
    Override,
}

impl OperatorCommand {
    /// Decode a key press.  Anything other than `override_key` is ignored.
    pub fn from_key(key: u8, override_key: u8) -> Option<Self> {
        (key == override_key).then_some(Self::Override)
    }
}
