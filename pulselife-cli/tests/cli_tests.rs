//! CLI integration tests - run the `pulselife` binary end to end

use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Run the binary inside an empty directory so no config file is discovered
fn pulselife(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pulselife"));
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("failed to run pulselife");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout should be utf-8")
}

#[test]
fn test_evaluate_baseline_text() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(pulselife(&dir).args(["evaluate"]));
    assert!(stdout.contains("encryption=50 access=50 sampling=50"));
    assert!(stdout.contains("battery=6.0y security=50 accessibility=40"));
    assert!(stdout.contains("OPTIMAL_STABILIZATION [SYS_OK]"));
}

#[test]
fn test_evaluate_json_lockout() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(pulselife(&dir).args([
        "evaluate",
        "--encryption",
        "100",
        "--access",
        "10",
        "--sampling",
        "100",
        "--format",
        "json",
        "--explain",
    ]));
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["outcome"], "LOCKOUT_DEATH");
    assert_eq!(value["metrics"]["security_score"], 97);
    assert_eq!(value["explanation"].as_array().unwrap().len(), 7);
}

#[test]
fn test_evaluate_clamps_by_default() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(pulselife(&dir).args(["evaluate", "--sampling", "-40"]));
    assert!(stdout.contains("sampling=0"));
    assert!(stdout.contains("ALGORITHM_FAILURE"));
}

#[test]
fn test_evaluate_reject_policy_fails() {
    let dir = TempDir::new().unwrap();
    let output = pulselife(&dir)
        .args(["evaluate", "--access", "140", "--range-policy", "reject"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("access must be within 0..=100 (got 140)"));
}

#[test]
fn test_sweep_json_counts() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(pulselife(&dir).args(["sweep", "--step", "50", "--format", "json"]));
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["total"], 27);
    assert_eq!(value["counts"].as_array().unwrap().len(), 7);
}

#[test]
fn test_sweep_rejects_zero_step() {
    let dir = TempDir::new().unwrap();
    let output = pulselife(&dir).args(["sweep", "--step", "0"]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_outcomes_lists_all_codes() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(pulselife(&dir).args(["outcomes"]));
    for code in [
        "ERR_BAT", "ERR_AUTH", "ERR_HACK", "SYS_OK", "WARN_LEAK", "ERR_LAG", "ERR_NOSIG",
    ] {
        assert!(stdout.contains(code), "missing {}", code);
    }
}

#[test]
fn test_session_replays_changes_and_commits() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(pulselife(&dir).args([
        "session",
        "--set",
        "encryption=0",
        "--set",
        "access=100",
        "--format",
        "json",
    ]));
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["commit"]["outcome"], "RANSOMWARE");
    let log = value["log"].as_array().unwrap();
    assert!(log.iter().any(|l| l == "WARN: PORT 80 OPEN - LISTENING"));
    assert!(log
        .iter()
        .any(|l| l == "WARN: CRITICAL: FIRMWARE VULNERABLE TO INJECTION"));
}

#[test]
fn test_config_file_changes_thresholds() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".pulseliferc.json"),
        r#"{"thresholds": {"battery_death_years": 6.5}}"#,
    )
    .unwrap();

    let stdout = stdout_of(pulselife(&dir).args(["evaluate"]));
    assert!(stdout.contains("SURGICAL_FAILURE"));
}

#[test]
fn test_config_validate_reports_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"baseline": {"encryption": 150}}"#).unwrap();

    let output = pulselife(&dir)
        .args(["config", "validate", "--path"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_config_show_defaults() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(pulselife(&dir).args(["config", "show"]));
    assert!(stdout.contains("Config file: (none, using defaults)"));
    assert!(stdout.contains("Range policy: clamp"));
    assert!(stdout.contains("Baseline:     encryption=50 access=50 sampling=50"));
}
