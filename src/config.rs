//! Run configuration
//!
//! [`ControllerConfig`] is what the operator supplies on the command line.
//! [`ScheduleConfig`] is derived from it once, validated, and stays fixed for
//! the lifetime of a run.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Automatic transitions per run.
pub const DEFAULT_MAX_CYCLES: u32 = 20;

/// Busy-poll slice between trigger checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Pause between the operator's go-ahead and the first command.
pub const DEFAULT_START_DELAY: Duration = Duration::from_secs(1);

/// Key that fires a manual override.
pub const OVERRIDE_KEY: u8 = b'0';

#[cfg(windows)]
pub const DEFAULT_WRITE_DIR: &str = "C:\\Data\\TSLog\\";
#[cfg(not(windows))]
pub const DEFAULT_WRITE_DIR: &str = "./data";

#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM3";
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

pub const DEFAULT_BAUD: u32 = 9600;

/// Full on/off activation cycle, in minutes.
pub const DEFAULT_CYCLE_PERIOD_MINUTES: f64 = 2.0;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Cycle period is zero, negative, NaN or infinite.
    InvalidCyclePeriod,
    /// A run needs at least one automatic cycle.
    ZeroCycles,
    /// Baud rate of zero.
    InvalidBaud,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidCyclePeriod => write!(f, "cycle period must be a positive number of minutes"),
            Self::ZeroCycles => write!(f, "max cycles must be at least 1"),
            Self::InvalidBaud => write!(f, "baud rate must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Operator-facing settings
// ---------------------------------------------------------------------------

/// Settings collected from the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Directory the CSV log is written to.
    pub write_dir: PathBuf,
    /// Serial baud rate of the solenoid controller.
    pub baud: u32,
    /// Serial port identifier (`COM3`, `/dev/ttyUSB0`, ...).
    pub port: String,
    /// Full activation cycle (on + off) in minutes.
    pub cycle_period_minutes: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            write_dir: PathBuf::from(DEFAULT_WRITE_DIR),
            baud: DEFAULT_BAUD,
            port: DEFAULT_PORT.to_string(),
            cycle_period_minutes: DEFAULT_CYCLE_PERIOD_MINUTES,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baud == 0 {
            return Err(ConfigError::InvalidBaud);
        }
        ScheduleConfig::from_cycle_minutes(self.cycle_period_minutes).map(|_| ())
    }

    pub fn schedule(&self) -> Result<ScheduleConfig, ConfigError> {
        ScheduleConfig::from_cycle_minutes(self.cycle_period_minutes)
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Timing parameters of the override loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Interval between automatic commands: half of the full activation cycle.
    pub command_cycle_period: Duration,
    /// Automatic transitions to fire before shutting down.
    pub max_cycles: u32,
    pub poll_interval: Duration,
    pub start_delay: Duration,
    pub override_key: u8,
}

impl ScheduleConfig {
    /// Build from the *full* activation cycle in minutes.  The command period
    /// is half of it: one command turns the device on, the next turns it off.
    pub fn from_cycle_minutes(minutes: f64) -> Result<Self, ConfigError> {
        if !minutes.is_finite() || minutes <= 0.0 {
            return Err(ConfigError::InvalidCyclePeriod);
        }
        let half = Duration::try_from_secs_f64(minutes * 60.0 / 2.0)
            .map_err(|_| ConfigError::InvalidCyclePeriod)?;
        Self::with_period(half)
    }

    /// Build directly from the command period (already halved).
    pub fn with_period(command_cycle_period: Duration) -> Result<Self, ConfigError> {
        if command_cycle_period.is_zero() {
            return Err(ConfigError::InvalidCyclePeriod);
        }
        Ok(Self {
            command_cycle_period,
            max_cycles: DEFAULT_MAX_CYCLES,
            poll_interval: DEFAULT_POLL_INTERVAL,
            start_delay: DEFAULT_START_DELAY,
            override_key: OVERRIDE_KEY,
        })
    }

    pub fn with_max_cycles(mut self, max_cycles: u32) -> Result<Self, ConfigError> {
        if max_cycles == 0 {
            return Err(ConfigError::ZeroCycles);
        }
        self.max_cycles = max_cycles;
        Ok(self)
    }

    /// Offset of the trailing sentinel row from the last real transition.
    pub fn sentinel_offset(&self) -> Duration {
        self.command_cycle_period / 2
    }
}
