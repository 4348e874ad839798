//! Port traits — the hexagonal boundary between the override loop and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ OverrideLoop (domain)
//! ```
//!
//! Driven adapters (serial link, keyboard, CSV file, wall clock, console)
//! implement these traits.  The [`OverrideLoop`](super::service::OverrideLoop)
//! consumes them via generics, so the domain core never touches a tty or a
//! file handle directly.
//!
//! All port errors are typed and every one of them is fatal to a run: no
//! port is ever retried.

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::transition_log::Snapshot;

/// Byte that tells the solenoid controller to flip its output.
pub const TOGGLE_COMMAND: u8 = b'0';

// ───────────────────────────────────────────────────────────────
// Device channel (driven adapter: domain → solenoid controller)
// ───────────────────────────────────────────────────────────────

/// Write-side port to the actuator.
///
/// The protocol is stateless and unacknowledged: every call sends exactly one
/// [`TOGGLE_COMMAND`] byte, and the device flips whatever state it is in.
pub trait DeviceChannel {
    fn send_toggle(&mut self) -> Result<(), DeviceError>;
}

// ───────────────────────────────────────────────────────────────
// Operator input (driving adapter: keyboard → domain)
// ───────────────────────────────────────────────────────────────

/// Non-blocking key source.
pub trait OperatorInput {
    /// Return the next pending key press, or `None` if nothing is waiting.
    /// Must never block.
    fn poll_key(&mut self) -> Result<Option<u8>, InputError>;
}

// ───────────────────────────────────────────────────────────────
// Persister (driven adapter: domain → durable storage)
// ───────────────────────────────────────────────────────────────

/// Writes the full transition table, replacing whatever was stored before.
///
/// A write either lands completely or leaves the previous table untouched.
pub trait Persister {
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), PersistError>;
}

// ───────────────────────────────────────────────────────────────
// Clock (driven adapter: domain ↔ time)
// ───────────────────────────────────────────────────────────────

/// Time source plus the loop's only intentional suspension point.
///
/// Two readings are exposed.  `now` is the civil time stamped on rows and may
/// jump (NTP, manual correction).  `monotonic` never goes backwards and is
/// what the schedule is measured on.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Time since a fixed, arbitrary origin on a monotonic source.
    fn monotonic(&self) -> Duration;

    fn sleep(&mut self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: domain → console / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent<'_>);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`DeviceChannel`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The write call failed.
    Write(String),
    /// The write succeeded but the byte could not be flushed to the wire.
    Flush(String),
}

/// Errors from [`Persister`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// The destination could not be created or opened.
    Open { path: String, reason: String },
    /// Writing the table failed part way.
    Write { path: String, reason: String },
}

/// Errors from [`OperatorInput`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The terminal could not be polled or read.
    Terminal(String),
    /// Ctrl-C while the terminal was in raw mode.
    Interrupted,
    /// Standard input closed while waiting for the operator.
    EndOfInput,
}

impl core::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Write(msg) => write!(f, "write failed: {}", msg),
            Self::Flush(msg) => write!(f, "flush failed: {}", msg),
        }
    }
}

impl core::fmt::Display for PersistError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Open { path, reason } => write!(f, "cannot open {}: {}", path, reason),
            Self::Write { path, reason } => write!(f, "cannot write {}: {}", path, reason),
        }
    }
}

impl core::fmt::Display for InputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Terminal(msg) => write!(f, "terminal error: {}", msg),
            Self::Interrupted => write!(f, "interrupted by operator"),
            Self::EndOfInput => write!(f, "standard input closed"),
        }
    }
}

impl std::error::Error for DeviceError {}
impl std::error::Error for PersistError {}
impl std::error::Error for InputError {}
