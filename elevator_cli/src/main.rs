mod cli;
mod error_fmt;
mod run;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use elevator_config::Config;
use elevator_core::{Admission, Arrival, StepReport};
use eyre::{Result, WrapErr};
use serde_json::json;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::run::ReplaySummary;

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = real_main(cli) {
        let json = JSON_MODE.get().copied().unwrap_or(false);
        if json {
            println!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
            if tracing::enabled!(tracing::Level::DEBUG) {
                eprintln!("\n{err:?}");
            }
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn real_main(cli: Cli) -> Result<()> {
    let _ = color_eyre::install();
    let cfg = load_config(cli.config.as_deref())?;
    init_tracing(&cli, &cfg)?;

    match cli.cmd {
        Commands::Run { stats } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                .wrap_err("install Ctrl-C handler")?;
            run::run_live(&cfg, stats, shutdown)?;
        }
        Commands::Replay { script, max_ms } => {
            let steps = elevator_config::load_script_csv(&script)?;
            let json = cli.json;
            let summary = run::replay(&cfg, &steps, max_ms, |r| {
                if json {
                    print_report_jsonl(r);
                }
            })?;
            if json {
                print_summary_json(&summary);
            } else {
                print_summary(&summary);
            }
        }
        Commands::SelfCheck => {
            run::self_check(&cfg)?;
            if cli.json {
                println!("{}", json!({ "self_check": "ok" }));
            } else {
                println!("OK");
            }
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let cfg = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("read config {}", path.display()))?;
            toml::from_str::<Config>(&text).wrap_err("parse config TOML")?
        }
        None => Config::default(),
    };
    cfg.validate().wrap_err("invalid configuration")?;
    Ok(cfg)
}

/// Console layer on stderr plus an optional JSON file sink from `[logging]`.
///
/// `RUST_LOG` wins over `--log-level`; `logging.level` applies when the
/// flag is left at its default.
fn init_tracing(cli: &Cli, cfg: &Config) -> Result<()> {
    let level = match cfg.logging.level.as_deref() {
        Some(l) if cli.log_level == "info" => l.to_string(),
        _ => cli.log_level.clone(),
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .wrap_err_with(|| format!("invalid log level '{level}'"))?;

    let mut layers: Vec<Box<dyn tracing_subscriber::Layer<Registry> + Send + Sync>> = Vec::new();
    if cli.json {
        layers.push(fmt::layer().json().with_writer(std::io::stderr).boxed());
    } else {
        layers.push(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .boxed(),
        );
    }

    if let Some(file) = cfg.logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| eyre::eyre!("logging.file has no file name: {file}"))?;
        let appender = match cfg.logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
    }

    // A subscriber may already be installed (tests); keep it
    let _ = tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init();
    Ok(())
}

fn print_report_jsonl(r: &StepReport) {
    if let Some((req, outcome)) = r.intake {
        let (accepted, reason) = match outcome {
            Admission::Accepted => (true, None),
            Admission::Rejected(why) => (false, Some(format!("{why:?}"))),
        };
        println!(
            "{}",
            json!({
                "t_ms": r.now_ms,
                "event": "request",
                "origin": req.origin.index(),
                "destination": req.destination.index(),
                "accepted": accepted,
                "reason": reason,
            })
        );
    }
    if let Some(arrival) = r.arrival {
        let (event, req) = match arrival {
            Arrival::Pickup(req) => ("pickup", req),
            Arrival::DropOff(req) => ("drop_off", req),
        };
        println!(
            "{}",
            json!({
                "t_ms": r.now_ms,
                "event": event,
                "origin": req.origin.index(),
                "destination": req.destination.index(),
                "position": r.position.value(),
            })
        );
    }
}

fn print_summary_json(s: &ReplaySummary) {
    println!(
        "{}",
        json!({
            "event": "summary",
            "elapsed_ms": s.elapsed_ms,
            "iterations": s.iterations,
            "accepted": s.accepted,
            "rejected": s.rejected,
            "trips": s.trips,
            "floors_with_passenger": s.counters.with_passenger,
            "floors_without_passenger": s.counters.without_passenger,
            "final_floor": s.final_floor.map(|f| f.index()),
            "final_position": s.final_position,
            "completed": s.completed,
        })
    );
}

fn print_summary(s: &ReplaySummary) {
    if s.completed {
        println!("Replay complete after {} ms", s.elapsed_ms);
    } else {
        println!("Replay stopped at {} ms (max-ms reached)", s.elapsed_ms);
    }
    println!("Requests accepted/rejected: {} / {}", s.accepted, s.rejected);
    println!("Trips: {}", s.trips);
    println!("Floors with Passenger: {}", s.counters.with_passenger);
    println!("Floors without Passenger: {}", s.counters.without_passenger);
    match s.final_floor {
        Some(f) => println!("Final floor: {f}"),
        None => println!("Final floor: between floors (position {})", s.final_position),
    }
}
