//! Smoke tests for the todoprobe CLI
//!
//! Everything here runs against the simulated app; no browser needed.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn todoprobe() -> Command {
    let mut cmd = Command::cargo_bin("todoprobe").expect("todoprobe binary should exist");
    cmd.env_remove("RUST_LOG")
        .env_remove("TODOPROBE_CONFIG")
        .env_remove("TODOPROBE_BASE_URL");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    todoprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    todoprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("TodoMVC"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("mutants"));
}

#[test]
fn test_no_args_fails() {
    todoprobe().assert().failure();
}

#[test]
fn test_run_help_lists_flags() {
    todoprobe()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--fail-fast"))
        .stdout(predicate::str::contains("--simulated"));
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn test_list() {
    todoprobe()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initial page"))
        .stdout(predicate::str::contains("  persists its data"))
        .stdout(predicate::str::contains("Routing (before each: default todos)"));
}

#[test]
fn test_run_simulated_passes() {
    todoprobe()
        .args(["run", "--simulated", "--color", "never"])
        .assert()
        .success()
        .stderr(predicate::str::contains("PASS Counter / displays the current number of todo items"))
        .stderr(predicate::str::contains("PASSED 26 scenarios"));
}

#[test]
fn test_run_simulated_json_to_stdout() {
    let output = todoprobe()
        .args([
            "run",
            "--simulated",
            "-q",
            "--filter",
            "editing",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["outcomes"].as_array().unwrap().len(), 5);
    assert_eq!(report["driver"], "simulated");
}

#[test]
fn test_run_simulated_writes_junit() {
    let dir = TempDir::new().unwrap();
    todoprobe()
        .args(["run", "--simulated", "-q", "--format", "junit", "--output"])
        .arg(dir.path())
        .assert()
        .success();
    let xml = fs::read_to_string(dir.path().join("junit.xml")).unwrap();
    assert!(xml.contains(r#"tests="26" failures="0""#));
}

#[test]
fn test_filter_matching_nothing_still_succeeds() {
    todoprobe()
        .args(["run", "--simulated", "--filter", "no such scenario", "--color", "never"])
        .assert()
        .success()
        .stderr(predicate::str::contains("PASSED 0 scenarios"));
}

#[test]
fn test_mutants_all_killed() {
    todoprobe()
        .args(["mutants", "--color", "never"])
        .assert()
        .success()
        .stderr(predicate::str::contains("baseline: passed"))
        .stderr(predicate::str::contains("killed   edit-no-trim"))
        .stderr(predicate::str::contains("mutation score: 14/14 (100.0%)"));
}

#[test]
fn test_mutants_quiet_prints_nothing_when_all_killed() {
    todoprobe()
        .args(["mutants", "-q"])
        .assert()
        .success()
        .stderr(predicate::str::contains("mutation score").not());
}

#[test]
fn test_config_prints_yaml() {
    todoprobe()
        .args(["config", "--timeout", "2500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("command_timeout_ms: 2500"))
        .stdout(predicate::str::contains("headless: true"));
}

#[test]
fn test_config_file_is_layered() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("todoprobe.yaml");
    fs::write(&path, "fail_fast: true\npoll_interval_ms: 25\n").unwrap();
    todoprobe()
        .arg("--config")
        .arg(&path)
        .args(["config", "--no-sandbox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fail_fast: true"))
        .stdout(predicate::str::contains("poll_interval_ms: 25"))
        .stdout(predicate::str::contains("sandbox: false"));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("todoprobe.yaml");
    fs::write(&path, "base_url: not-a-url\n").unwrap();
    todoprobe()
        .arg("--config")
        .arg(&path)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url"));
}
