//! Application core — the override loop and its port boundary.
//!
//! This module contains the run logic of the solenoid controller: trigger
//! arbitration, the state-change transaction, and shutdown.  All interaction
//! with the serial link, keyboard, clock and filesystem happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without a real device attached.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
