//! Solenoid Cycler — main entry point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SerialDevice     KeyboardInput    CsvFilePersister            │
//! │  (DeviceChannel)  (OperatorInput)  (Persister)                 │
//! │  SystemClock      ConsoleEventSink                             │
//! │  (Clock)          (EventSink)                                  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            OverrideLoop (pure run logic)               │    │
//! │  │  Scheduler · RunContext · TransitionLog                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::{error, info};

use solenoid_cycler::adapters::console::ConsoleEventSink;
use solenoid_cycler::adapters::csv_file::CsvFilePersister;
use solenoid_cycler::adapters::keyboard::KeyboardInput;
use solenoid_cycler::adapters::serial::SerialDevice;
use solenoid_cycler::adapters::terminal::{confirm_log_path, wait_for_start};
use solenoid_cycler::adapters::time::SystemClock;
use solenoid_cycler::app::service::OverrideLoop;
use solenoid_cycler::cli::Cli;
use solenoid_cycler::config::ControllerConfig;
use solenoid_cycler::output_path::default_log_path;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse().into()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("\r\nFATAL: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: ControllerConfig) -> Result<()> {
    config.validate().context("invalid settings")?;
    let schedule = config.schedule()?;
    info!("Settings: {}", serde_json::to_string(&config)?);

    // ── 1. Pick the output file ───────────────────────────────
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let default_path = default_log_path(&config.write_dir, Local::now().date_naive());
    let path = confirm_log_path(&mut stdin.lock(), &mut stdout, &default_path)?;
    std::fs::create_dir_all(&config.write_dir)
        .with_context(|| format!("cannot create {}", config.write_dir.display()))?;

    // ── 2. Open the device (fatal before anything is recorded) ─
    let device = SerialDevice::open(&config.port, config.baud)?;

    // ── 3. Operator go-ahead ──────────────────────────────────
    wait_for_start(&mut stdin.lock(), &mut stdout)?;

    // ── 4. Run ────────────────────────────────────────────────
    let input = KeyboardInput::enable()?;
    let mut sink = ConsoleEventSink::stdout(schedule.override_key);
    let mut controller = OverrideLoop::new(
        schedule,
        device,
        input,
        CsvFilePersister::new(&path),
        SystemClock::new(),
    );
    let outcome = controller.run(&mut sink);

    // Leave raw mode before anything else is printed.
    let (device, mut input, _, _, log) = controller.into_parts();
    input.restore();
    info!("Sent {} toggle commands, {} rows in {}", device.sent(), log.len(), path.display());

    outcome.with_context(|| format!("run aborted; last good table is in {}", path.display()))?;
    println!("Log written to {}", path.display());
    Ok(())
}
