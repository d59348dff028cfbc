use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const BIN: &str = env!("CARGO_BIN_EXE_pid-sim");

fn run_sim(dir: &Path, extra: &[&str]) -> Output {
    run_sim_with_filter(dir, extra, "warn")
}

fn run_sim_with_filter(dir: &Path, extra: &[&str], filter: &str) -> Output {
    Command::new(BIN)
        .current_dir(dir)
        .arg("--no-pacing")
        .args(extra)
        .env("RUST_LOG", filter)
        .output()
        .expect("Failed to start pid-sim")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_default_run_writes_reference_csv() {
    let dir = tempdir().unwrap();
    let output = run_sim(dir.path(), &[]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let csv = std::fs::read_to_string(dir.path().join("log.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 201);
    assert_eq!(lines[0], "cycle,target_speed,actual_speed,error,control_signal");
    assert_eq!(lines[1], "0,100.0000,45.1369,54.8631,90.5000");

    for (i, line) in lines[1..].iter().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0], i.to_string());
        assert_eq!(fields[1], "100.0000");
    }

    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("Starting PID Motor Control Simulation...\n"));
    assert!(stdout.contains("Target Speed: 100.00 RPM"));
    assert!(stdout.contains("PID Gains: Kp=0.50, Ki=0.10, Kd=0.02"));
    assert!(stdout.contains("[Cycle 000] Target: 100.00 | Speed: 45.14 | Error: 54.86 | Output: 90.50"));
    assert!(stdout.contains("[Cycle 199]"));
    assert!(stdout.contains("Simulation finished. Data saved to log.csv"));
}

#[test]
fn test_two_runs_are_byte_identical() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    assert!(run_sim(first.path(), &["--quiet"]).status.success());
    assert!(run_sim(second.path(), &["--quiet"]).status.success());

    let a = std::fs::read(first.path().join("log.csv")).unwrap();
    let b = std::fs::read(second.path().join("log.csv")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_overrides_and_quiet_mode() {
    let dir = tempdir().unwrap();
    let output = run_sim(
        dir.path(),
        &["--quiet", "--cycles", "10", "--target", "50", "--csv", "short.csv"],
    );
    assert!(output.status.success());
    assert!(!stdout_of(&output).contains("[Cycle"));

    let csv = std::fs::read_to_string(dir.path().join("short.csv")).unwrap();
    assert_eq!(csv.lines().count(), 11);
    assert!(csv.lines().skip(1).all(|l| l.split(',').nth(1) == Some("50.0000")));
}

#[test]
fn test_invalid_time_step_is_rejected() {
    let dir = tempdir().unwrap();
    let output = run_sim(dir.path(), &["--dt", "0"]);
    assert!(!output.status.success());
    assert!(!dir.path().join("log.csv").exists());
}

#[test]
fn test_unknown_flag_exits_with_usage_error() {
    let dir = tempdir().unwrap();
    let output = run_sim(dir.path(), &["--frobnicate"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_print_config_round_trips_through_config_file() {
    let dir = tempdir().unwrap();
    let output = run_sim(dir.path(), &["--kp", "0.8", "--print-config"]);
    assert!(output.status.success());
    let printed = stdout_of(&output);
    std::fs::write(dir.path().join("sim.json"), &printed).unwrap();

    let value: serde_json::Value = serde_json::from_str(&printed).unwrap();
    assert_eq!(value["gains"]["kp"], 0.8);
    assert_eq!(value["cycles"], 200);

    let output = run_sim(dir.path(), &["--config", "sim.json", "--cycles", "3", "--quiet"]);
    assert!(output.status.success());
    let csv = std::fs::read_to_string(dir.path().join("log.csv")).unwrap();
    assert_eq!(csv.lines().count(), 4);
}

#[test]
fn test_log_file_is_flushed_before_exit() {
    let dir = tempdir().unwrap();
    let output = run_sim_with_filter(
        dir.path(),
        &["--log-file", "diag.log", "--quiet", "--cycles", "3"],
        "info",
    );
    assert!(output.status.success());

    let log = std::fs::read_to_string(dir.path().join("diag.log")).unwrap();
    assert!(log.contains("Run complete"), "log file: {}", log);
}

#[test]
fn test_json_logs_emit_one_object_per_line() {
    let dir = tempdir().unwrap();
    let output = run_sim_with_filter(
        dir.path(),
        &["--json-logs", "--quiet", "--cycles", "3"],
        "info",
    );
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    assert!(!lines.is_empty());
    for line in &lines {
        let value: serde_json::Value = serde_json::from_str(line)
            .unwrap_or_else(|e| panic!("not JSON ({}): {}", e, line));
        assert!(value.get("level").is_some());
    }
    assert!(stderr.contains("Run complete"));
}
