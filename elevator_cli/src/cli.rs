//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "elevator", version, about = "Four-floor elevator controller")]
pub struct Cli {
    /// Path to config TOML; board defaults are used when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log and report as JSON lines instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive the controller in real time from the keyboard
    ///
    /// Keys 0-3 call the car to that floor, z/x/c/v set the destination
    /// selector to floors 0-3 and f toggles the speed switch. Keys act
    /// immediately on a console; piped stdin is read byte by byte. Ctrl-C stops.
    Run {
        /// Print control loop statistics on exit
        #[arg(long, action = ArgAction::SetTrue)]
        stats: bool,
    },
    /// Replay a CSV input script on a virtual clock
    Replay {
        /// Script with headers at_ms,kind,value
        #[arg(long, value_name = "FILE")]
        script: PathBuf,
        /// Stop after this much virtual time even if the car is still busy
        #[arg(long = "max-ms", value_name = "MS")]
        max_ms: Option<u64>,
    },
    /// Validate the config and build a controller on simulated surfaces
    SelfCheck,
}
