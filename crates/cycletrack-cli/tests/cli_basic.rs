//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with `CYCLETRACK_DATA_DIR` pointing at a
//! fresh temporary directory and verify outputs.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

fn cli_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cycletrack-cli"))
}

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(cli_bin())
        .env("CYCLETRACK_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run a CLI command and expect success.
fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed: {:?}\n{}", args, stderr);
    stdout
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let stdout = run_cli_success(data_dir, args);
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

fn log_period(data_dir: &Path, subject: &str, first_day: u32, month: u32, days: u32) {
    for day in first_day..first_day + days {
        let date = format!("2024-{month:02}-{day:02}");
        run_cli_success(
            data_dir,
            &["--subject", subject, "entry", "log", "--date", &date, "--period"],
        );
    }
}

#[test]
fn test_config_list_has_engine_section() {
    let dir = TempDir::new().unwrap();
    let config = run_json(dir.path(), &["config", "list"]);
    assert_eq!(config["engine"]["min_cycle_spacing_days"], 10);
    assert_eq!(config["defaults"]["average_cycle_length"], 28);
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["config", "set", "engine.luteal_phase_days", "12"]);
    let value = run_cli_success(dir.path(), &["config", "get", "engine.luteal_phase_days"]);
    assert_eq!(value.trim(), "12");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "engine.nope", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown config key"));

    run_cli_success(dir.path(), &["config", "reset"]);
    let value = run_cli_success(dir.path(), &["config", "get", "engine.luteal_phase_days"]);
    assert_eq!(value.trim(), "14");
}

#[test]
fn test_config_path_and_validate() {
    let dir = TempDir::new().unwrap();
    let path = run_cli_success(dir.path(), &["config", "path"]);
    assert_eq!(PathBuf::from(path.trim()), dir.path().join("config.toml"));

    let out = run_cli_success(dir.path(), &["config", "validate"]);
    assert!(out.trim().ends_with(": ok"));

    std::fs::write(
        dir.path().join("config.toml"),
        "[engine]\novulation_window_radius = 14\n",
    )
    .unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "validate"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("engine.ovulation_window_radius"));
}

#[test]
fn test_config_set_rejects_oversized_window_radius() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["config", "set", "engine.ovulation_window_radius", "4294967295"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("engine.ovulation_window_radius"));

    let value = run_cli_success(dir.path(), &["config", "get", "engine.ovulation_window_radius"]);
    assert_eq!(value.trim(), "1");
}

#[test]
fn test_malformed_config_warns_and_uses_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "engine = [").unwrap();
    log_period(dir.path(), "default", 1, 1, 5);

    let (stdout, stderr, code) = run_cli(dir.path(), &["cycle", "today", "--date", "2024-01-15"]);
    assert_eq!(code, 0, "{stderr}");
    assert!(stderr.contains("falling back to defaults"));
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["context"]["phase"], "ovulation");
}

#[test]
fn test_entry_log_and_list() {
    let dir = TempDir::new().unwrap();
    run_cli_success(
        dir.path(),
        &[
            "entry", "log", "--date", "2024-01-01", "--period", "--flow", "heavy", "--symptom",
            "cramps", "--symptom", "fatigue", "--temp", "36.4",
        ],
    );
    run_cli_success(dir.path(), &["entry", "log", "--date", "2024-01-10"]);

    let entries = run_json(dir.path(), &["entry", "list", "--json"]);
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["date"], "2024-01-01");
    assert_eq!(entries[0]["is_period"], true);
    assert_eq!(entries[0]["flow_intensity"], "heavy");
    assert_eq!(entries[0]["symptoms"]["cramps"], true);
    assert_eq!(entries[0]["symptoms"]["fatigue"], true);
    assert_eq!(entries[1]["is_period"], false);

    let text = run_cli_success(dir.path(), &["entry", "list"]);
    assert!(text.contains("2024-01-01  period  flow=heavy"));
}

#[test]
fn test_entry_log_rejects_unknown_symptom() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(
        dir.path(),
        &["entry", "log", "--date", "2024-01-01", "--symptom", "sneezing"],
    );
    assert_ne!(code, 0);
}

#[test]
fn test_entry_log_rejects_flow_without_period() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["entry", "log", "--date", "2024-01-12", "--flow", "light"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("flow_intensity"));

    let entries = run_json(dir.path(), &["entry", "list", "--json"]);
    assert!(entries.as_array().unwrap().is_empty());
}

#[test]
fn test_entry_delete() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["entry", "log", "--date", "2024-01-01", "--period"]);
    run_cli_success(dir.path(), &["entry", "delete", "--date", "2024-01-01"]);

    let entries = run_json(dir.path(), &["entry", "list", "--json"]);
    assert!(entries.as_array().unwrap().is_empty());

    let (_, _, code) = run_cli(dir.path(), &["entry", "delete", "--date", "2024-01-01"]);
    assert_ne!(code, 0);
}

#[test]
fn test_entry_import() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("entries.json");
    std::fs::write(
        &file,
        r#"[
            {"date": "2024-01-01", "is_period": true},
            {"date": "2024-01-02", "is_period": true, "flow_intensity": "light"},
            {"date": "2024-01-15", "symptoms": {"bloating": true}}
        ]"#,
    )
    .unwrap();

    let out = run_cli_success(dir.path(), &["entry", "import", file.to_str().unwrap()]);
    assert!(out.contains("Imported 3 entries"));

    let entries = run_json(dir.path(), &["entry", "list", "--json"]);
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e["source"] == "imported"));
}

#[test]
fn test_cycle_today_tracks_current_cycle() {
    let dir = TempDir::new().unwrap();
    log_period(dir.path(), "alice", 1, 1, 5);
    log_period(dir.path(), "alice", 29, 1, 3);
    log_period(dir.path(), "alice", 1, 2, 2);

    let status = run_json(
        dir.path(),
        &["--subject", "alice", "cycle", "today", "--date", "2024-02-10"],
    );
    assert_eq!(status["status"], "tracking");
    let context = &status["context"];
    assert_eq!(context["phase"], "ovulation");
    assert_eq!(context["cycle_day"], 13);
    assert_eq!(context["cycle_start"], "2024-01-29");
    assert_eq!(context["next_period"], "2024-02-26");
    assert_eq!(context["days_until_next_period"], 16);
}

#[test]
fn test_cycle_today_without_history() {
    let dir = TempDir::new().unwrap();
    let status = run_json(dir.path(), &["cycle", "today", "--date", "2024-02-10"]);
    assert_eq!(status["status"], "insufficient_data");
}

#[test]
fn test_subjects_are_isolated() {
    let dir = TempDir::new().unwrap();
    log_period(dir.path(), "alice", 1, 1, 3);

    let status = run_json(
        dir.path(),
        &["--subject", "bob", "cycle", "today", "--date", "2024-01-02"],
    );
    assert_eq!(status["status"], "insufficient_data");
}

#[test]
fn test_profile_set_and_tracking_flag() {
    let dir = TempDir::new().unwrap();
    log_period(dir.path(), "default", 1, 1, 4);

    let profile = run_json(dir.path(), &["profile", "show"]);
    assert_eq!(profile["average_cycle_length"], 28);
    assert_eq!(profile["is_tracking"], true);

    let profile = run_json(
        dir.path(),
        &["profile", "set", "--cycle-length", "32", "--tracking", "false"],
    );
    assert_eq!(profile["average_cycle_length"], 32);
    assert_eq!(profile["average_period_length"], 5);

    let status = run_json(dir.path(), &["cycle", "today", "--date", "2024-01-03"]);
    assert_eq!(status["status"], "not_tracking");
}

#[test]
fn test_profile_set_rejects_out_of_range_length() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["profile", "set", "--cycle-length", "60"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("average_cycle_length"));
}

#[test]
fn test_cycle_phase_for_date() {
    let dir = TempDir::new().unwrap();
    let reading = run_json(
        dir.path(),
        &["cycle", "phase", "--date", "2024-01-15", "--start", "2024-01-01"],
    );
    assert_eq!(reading["phase"], "ovulation");
    assert_eq!(reading["cycle_day"], 15);

    let reading = run_json(
        dir.path(),
        &[
            "cycle", "phase", "--date", "2024-01-03", "--start", "2024-01-01", "--cycle-length",
            "35",
        ],
    );
    assert_eq!(reading["phase"], "menstrual");

    // No start given and nothing logged: indeterminate
    let reading = run_json(dir.path(), &["cycle", "phase", "--date", "2024-01-03"]);
    assert!(reading.is_null());
}

#[test]
fn test_cycle_history_and_patterns() {
    let dir = TempDir::new().unwrap();
    log_period(dir.path(), "default", 1, 1, 5);
    log_period(dir.path(), "default", 29, 1, 3);
    run_cli_success(
        dir.path(),
        &["entry", "log", "--date", "2024-01-20", "--symptom", "bloating"],
    );

    let history = run_json(dir.path(), &["cycle", "history"]);
    let cycles = history["cycles"].as_array().unwrap();
    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles[0]["length"], 28);
    assert!(cycles[1]["length"].is_null());
    assert_eq!(history["average_cycle_length"], 28);

    let patterns = run_json(dir.path(), &["cycle", "patterns"]);
    let patterns = patterns.as_array().unwrap();
    let luteal = patterns
        .iter()
        .find(|p| p["phase"] == "luteal")
        .expect("luteal phase present");
    assert_eq!(luteal["symptoms"][0]["symptom"], "bloating");
}
