//! Solenoid cycler library.
//!
//! Drives a toggle-on-command solenoid controller over a serial link on a
//! fixed schedule, lets the operator override the schedule from the
//! keyboard, and records every transition to a CSV file.
//!
//! The run logic lives in [`app`] and [`scheduler`] and only talks to the
//! outside world through the port traits in [`app::ports`]; the concrete
//! serial, keyboard, clock and file implementations are in [`adapters`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod fsm;
pub mod output_path;
pub mod scheduler;
pub mod transition_log;
