use pid_core::{ConfigError, SimulationConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{flag} requires a value")]
    MissingValue { flag: String },

    #[error("invalid value for {flag}: {value:?}")]
    InvalidValue { flag: String, value: String },

    #[error("unknown option {0:?} (see --help)")]
    UnknownFlag(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub show_help: bool,
    pub print_config: bool,
    pub sim: SimulationConfig,
    pub config_path: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
    pub jsonl_path: Option<PathBuf>,
    pub console: bool,
    pub pacing: bool,
    pub speedup: f64,
    pub json_logs: bool,
    pub log_file: Option<PathBuf>,
    pub metrics_addr: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            show_help: false,
            print_config: false,
            sim: SimulationConfig::default(),
            config_path: None,
            csv_path: Some(PathBuf::from("log.csv")),
            jsonl_path: None,
            console: true,
            pacing: true,
            speedup: 1.0,
            json_logs: false,
            log_file: None,
            metrics_addr: None,
        }
    }
}

fn take_value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, CliError> {
    let flag = &args[*i];
    match args.get(*i + 1) {
        Some(value) => {
            *i += 1;
            Ok(value.as_str())
        }
        None => Err(CliError::MissingValue { flag: flag.clone() }),
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, raw: &str) -> Result<T, CliError> {
    raw.parse::<T>().map_err(|_| CliError::InvalidValue {
        flag: flag.to_string(),
        value: raw.to_string(),
    })
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, CliError> {
        let args: Vec<String> = std::env::args().collect();
        Self::from_args(&args)
    }

    /// Defaults, then `--config <file>`, then individual flags.
    pub fn from_args(args: &[String]) -> Result<Self, CliError> {
        let mut cfg = RuntimeConfig::default();

        // The config file is the base layer regardless of where it appears.
        let mut i = 1;
        while i < args.len() {
            if args[i] == "--config" {
                let path = PathBuf::from(take_value(args, &mut i)?);
                cfg.sim = load_config_file(&path)?;
                cfg.config_path = Some(path);
            }
            i += 1;
        }

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--config" => {
                    take_value(args, &mut i)?;
                }
                "--target" => {
                    cfg.sim.target_speed = parse_value(flag, take_value(args, &mut i)?)?;
                }
                "--kp" => {
                    cfg.sim.gains.kp = parse_value(flag, take_value(args, &mut i)?)?;
                }
                "--ki" => {
                    cfg.sim.gains.ki = parse_value(flag, take_value(args, &mut i)?)?;
                }
                "--kd" => {
                    cfg.sim.gains.kd = parse_value(flag, take_value(args, &mut i)?)?;
                }
                "--dt" => {
                    cfg.sim.dt = parse_value(flag, take_value(args, &mut i)?)?;
                }
                "--inertia" => {
                    cfg.sim.motor.inertia = parse_value(flag, take_value(args, &mut i)?)?;
                }
                "--friction" => {
                    cfg.sim.motor.friction = parse_value(flag, take_value(args, &mut i)?)?;
                }
                "--cycles" => {
                    cfg.sim.cycles = parse_value(flag, take_value(args, &mut i)?)?;
                }
                "--csv" => {
                    cfg.csv_path = Some(PathBuf::from(take_value(args, &mut i)?));
                }
                "--no-csv" => {
                    cfg.csv_path = None;
                }
                "--jsonl" => {
                    cfg.jsonl_path = Some(PathBuf::from(take_value(args, &mut i)?));
                }
                "--quiet" | "-q" => {
                    cfg.console = false;
                }
                "--no-pacing" => {
                    cfg.pacing = false;
                }
                "--speedup" => {
                    let speedup: f64 = parse_value(flag, take_value(args, &mut i)?)?;
                    if !(speedup.is_finite() && speedup > 0.0) {
                        return Err(CliError::InvalidValue {
                            flag: flag.to_string(),
                            value: args[i].clone(),
                        });
                    }
                    cfg.speedup = speedup;
                }
                "--json-logs" => {
                    cfg.json_logs = true;
                }
                "--log-file" => {
                    cfg.log_file = Some(PathBuf::from(take_value(args, &mut i)?));
                }
                "--metrics-addr" => {
                    cfg.metrics_addr = Some(take_value(args, &mut i)?.to_string());
                }
                "--print-config" => {
                    cfg.print_config = true;
                }
                "--help" | "-h" => {
                    cfg.show_help = true;
                    break;
                }
                other => return Err(CliError::UnknownFlag(other.to_string())),
            }
            i += 1;
        }
        Ok(cfg)
    }

    pub fn print_help() {
        println!(
            r#"pid-sim - Closed-loop PID motor speed simulation

USAGE:
    pid-sim [OPTIONS]

SIMULATION OPTIONS:
    --config <PATH>         Load simulation parameters from a JSON file
    --target <RPM>          Target speed [default: 100.0]
    --kp <GAIN>             Proportional gain [default: 0.5]
    --ki <GAIN>             Integral gain [default: 0.1]
    --kd <GAIN>             Derivative gain [default: 0.02]
    --dt <SECS>             Fixed time step, must be > 0 [default: 0.05]
    --inertia <VALUE>       Motor inertia, must be non-zero [default: 0.1]
    --friction <VALUE>      Motor friction coefficient, >= 0 [default: 0.05]
    --cycles <N>            Number of simulation cycles [default: 200]

OUTPUT OPTIONS:
    --csv <PATH>            CSV output file [default: log.csv]
    --no-csv                Do not write a CSV file
    --jsonl <PATH>          Also write records as JSON Lines
    -q, --quiet             Do not print per-cycle status lines
    --no-pacing             Run at full speed instead of sleeping dt per cycle
    --speedup <FACTOR>      Divide the per-cycle sleep by FACTOR [default: 1]
    --json-logs             Output diagnostics in JSON format
    --log-file <PATH>       Also write diagnostics to a file
    --metrics-addr <ADDR>   Serve Prometheus metrics on address (e.g., 127.0.0.1:9090)
    --print-config          Print the effective simulation config as JSON and exit
    -h, --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log filter (e.g., RUST_LOG=debug,pid_core=trace)

EXAMPLES:
    # Reference run: 200 cycles at 50 ms, written to log.csv
    pid-sim

    # Instant run with a stiffer controller and no console spam
    pid-sim --no-pacing --quiet --kp 1.2 --ki 0.4

    # Parameters from a file, one flag overridden
    pid-sim --config tuning.json --cycles 1000 --jsonl run.jsonl
"#
        );
    }
}

fn load_config_file(path: &Path) -> Result<SimulationConfig, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SimulationConfig::from_json_str(&raw)?)
}
