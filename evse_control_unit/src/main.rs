//! # EVSE Control Unit
//!
//! Runs the charging station cycle against the simulated station host with
//! a scripted vehicle: plug in, start, charge to the target SOC, unplug.
//!
//! Configuration comes from an optional TOML file (`--config`); every
//! section falls back to the built-in defaults. The loop runs until
//! Ctrl-C or until `--ticks` cycles have executed.

use clap::Parser;
use evse_common::config::{ConfigLoader, StationConfig};
use evse_control_unit::cycle::CycleRunner;
use evse_control_unit::sim::{SimStation, VehicleModel};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// EVSE Control Unit: DC charging session controller
#[derive(Parser, Debug)]
#[command(name = "evse_control_unit")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Tick-driven charging session controller (simulated station)")]
struct Args {
    /// Path to station configuration TOML. Defaults apply when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop after this many cycles (default: run until Ctrl-C).
    #[arg(long)]
    ticks: Option<u64>,

    /// Run without the status display.
    #[arg(long)]
    no_display: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let config = load_config(&args);

    let directive = match &config {
        Ok(config) => config.shared.log_level.as_directive(),
        Err(_) => "info",
    };
    setup_tracing(&args, directive);

    info!("EVSE Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = config.and_then(|config| run(&args, &config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("EVSE Control Unit shutdown complete");
}

fn load_config(args: &Args) -> Result<StationConfig, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            let config = StationConfig::load(path)
                .map_err(|e| format!("{}: {e}", path.display()))?;
            config.validate()?;
            config
        }
        None => StationConfig::default(),
    };
    Ok(config)
}

fn run(args: &Args, config: &StationConfig) -> Result<(), Box<dyn std::error::Error>> {
    match &args.config {
        Some(path) => info!("Config loaded from {}", path.display()),
        None => info!("No config file given, using defaults"),
    }
    info!(
        "Config OK: service={}, cycle_time={}ms",
        config.shared.service_name, config.timing.cycle_time_ms
    );

    let station = SimStation::new(!args.no_display);
    let mut runner = CycleRunner::new(config, station)?;

    // Setup signal handler for graceful shutdown.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut vehicle = VehicleModel::default();
    let dt = config.timing.cycle_time_ms as f64 / 1000.0;
    runner.run(&running, args.ticks, |station, _| vehicle.advance(station, dt));

    let charger = runner.hal().charger();
    info!(
        "Final state {} after {} ticks: SOC {:.1}%, faults {:?}",
        runner.session().state().phase(),
        runner.ticks(),
        vehicle.soc(),
        charger.faults
    );
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
fn setup_tracing(args: &Args, directive: &str) {
    let level = if args.verbose { "debug" } else { directive };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
