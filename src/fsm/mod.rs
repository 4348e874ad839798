//! Device state model.
//!
//! The solenoid controller speaks a stateless protocol: every command byte
//! means "flip the output".  The controller therefore cannot be asked what
//! state it is in, and this crate tracks it on the host side instead.
//!
//! ```text
//!            toggle                      toggle
//!   ┌─────┐ ───────▶ ┌─────┐   ...   ┌─────┐ ───────▶ (Terminated)
//!   │ Off │          │ On  │         │ ... │   cycle_count == max_cycles
//!   └─────┘ ◀─────── └─────┘         └─────┘
//!            toggle
//! ```
//!
//! Both sides must agree on the starting point: the device is assumed to be
//! [`DeviceState::Off`] when the run begins.

pub mod context;

use core::fmt;

// ---------------------------------------------------------------------------
// Device state
// ---------------------------------------------------------------------------

/// Binary output state of the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceState {
    #[default]
    Off,
    On,
}

impl DeviceState {
    /// The state the device ends up in after one toggle command.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }

    /// Label written to the `System State` column.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::On => "On",
        }
    }

    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Trigger source
// ---------------------------------------------------------------------------

/// Why a transition fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// The command cycle period elapsed since the last transition.
    /// Counts toward the run's cycle limit.
    Automatic,
    /// The operator pressed the override key.  Re-anchors the schedule but
    /// never counts toward the cycle limit.
    Manual,
}

impl Trigger {
    pub const fn counts_as_cycle(self) -> bool {
        matches!(self, Self::Automatic)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Automatic => write!(f, "automatic"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

// ---------------------------------------------------------------------------
// Run phase
// ---------------------------------------------------------------------------

/// Lifecycle of one experiment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Constructed; no command sent yet.
    Pending,
    /// Polling for triggers.
    Running,
    /// Cycle limit reached and the sentinel row has been written.
    Terminated,
}
