use crate::runtime::config::{CliError, RuntimeConfig};
use crate::runtime::logging::init_tracing;
use crate::runtime::telemetry;
use pid_core::{
    ConfigError, ExecutionStats, NoPacing, Pacer, SimulationConfig, SimulationLoop,
    WallClockPacer,
};
use pid_io::{open_csv_or_skip, ConsoleRecorder, JsonlRecorder, RecorderSet};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid simulation config: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to render config: {0}")]
    Render(#[from] serde_json::Error),
}

pub fn run_from_args() -> ExitCode {
    let config = match RuntimeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return exit_code_for(&e);
        }
    };
    if config.show_help {
        RuntimeConfig::print_help();
        return ExitCode::SUCCESS;
    }
    if config.print_config {
        return match print_config(&config.sim) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let _guard = init_tracing(config.json_logs, config.log_file.as_deref());
    match run(config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Simulation aborted");
            ExitCode::FAILURE
        }
    }
}

fn exit_code_for(e: &CliError) -> ExitCode {
    match e {
        CliError::ConfigFile { .. } | CliError::Config(_) => ExitCode::FAILURE,
        _ => ExitCode::from(2),
    }
}

fn print_config(sim: &SimulationConfig) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(sim)?);
    Ok(())
}

/// Run one simulation to completion. Expects tracing to be initialized by the caller.
pub fn run(config: RuntimeConfig) -> Result<ExecutionStats, AppError> {
    config.sim.validate()?;
    if let Some(path) = &config.config_path {
        info!(path = %path.display(), "Loaded simulation config");
    }

    let (recorders, csv_path) = build_recorders(&config);
    info!(sinks = ?recorders.names(), "Record sinks ready");

    let sim = &config.sim;
    println!("Starting PID Motor Control Simulation...");
    println!("Target Speed: {:.2} RPM", sim.target_speed);
    println!(
        "PID Gains: Kp={:.2}, Ki={:.2}, Kd={:.2}",
        sim.gains.kp, sim.gains.ki, sim.gains.kd
    );
    if let Some(path) = &csv_path {
        println!("Logging data to {}", path.display());
    }
    println!();

    let pacer: Box<dyn Pacer> = if config.pacing {
        info!(
            speedup = config.speedup,
            nominal_duration_s = sim.duration_s(),
            "Pacing cycles against the wall clock"
        );
        Box::new(WallClockPacer::new().with_speedup(config.speedup))
    } else {
        Box::new(NoPacing)
    };

    let mut control_loop = SimulationLoop::from_config(sim, recorders, pacer)?;
    let stats = control_loop.run().clone();

    info!(
        cycles_executed = stats.cycles_executed,
        record_failures = stats.record_failures,
        final_speed = stats.final_speed,
        final_error = stats.final_error,
        integral = control_loop.controller().integral(),
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "Run complete"
    );
    if stats.record_failures > 0 {
        warn!(
            record_failures = stats.record_failures,
            "Some cycles were not fully recorded"
        );
    }

    match &csv_path {
        Some(path) => {
            println!("\nSimulation finished. Data saved to {}", path.display());
            println!(
                "To visualize, open {} in a spreadsheet program or use a plotting script.",
                path.display()
            );
        }
        None => println!("\nSimulation finished."),
    }

    Ok(stats)
}

/// Assemble every requested sink. Sinks that cannot be opened are skipped so
/// the simulation still runs. Returns the CSV path only if that sink is live.
fn build_recorders(config: &RuntimeConfig) -> (RecorderSet, Option<PathBuf>) {
    let mut set = RecorderSet::new();

    if config.console {
        set.push("console", ConsoleRecorder::stdout());
    }

    let mut csv_path = None;
    if let Some(path) = &config.csv_path {
        match open_csv_or_skip(path) {
            Some(csv) => {
                set.push("csv", csv);
                csv_path = Some(path.clone());
            }
            None => eprintln!("Failed to open log file. Continuing without file logging."),
        }
    }

    if let Some(path) = &config.jsonl_path {
        match JsonlRecorder::create(path, config.sim.dt) {
            Ok(jsonl) => {
                info!(path = %path.display(), "JSONL logging enabled");
                set.push("jsonl", jsonl);
            }
            Err(e) => warn!(error = %e, "Continuing without JSONL logging"),
        }
    }

    if let Some((metrics, _server)) = telemetry::start(&config.metrics_addr) {
        set.push("metrics", metrics);
    }

    (set, csv_path)
}
