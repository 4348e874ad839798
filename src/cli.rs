//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{
    ControllerConfig, DEFAULT_BAUD, DEFAULT_CYCLE_PERIOD_MINUTES, DEFAULT_PORT, DEFAULT_WRITE_DIR,
};

/// COM and data writing settings.
#[derive(Debug, Parser)]
#[command(name = "solenoid-cycler", version, about)]
pub struct Cli {
    /// Directory to save the data file in
    #[arg(short = 'd', long, default_value = DEFAULT_WRITE_DIR)]
    pub write_dir: PathBuf,

    /// Baud rate
    #[arg(short, long, default_value_t = DEFAULT_BAUD)]
    pub baud: u32,

    /// Serial port to open
    #[arg(short = 'c', long = "com-port", default_value = DEFAULT_PORT)]
    pub port: String,

    /// Activation cycle period in minutes (one full on + off cycle)
    #[arg(short = 'p', long, default_value_t = DEFAULT_CYCLE_PERIOD_MINUTES)]
    pub cycle_period: f64,
}

impl From<Cli> for ControllerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            write_dir: cli.write_dir,
            baud: cli.baud,
            port: cli.port,
            cycle_period_minutes: cli.cycle_period,
        }
    }
}
