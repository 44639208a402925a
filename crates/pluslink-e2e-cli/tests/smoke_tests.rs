//! Smoke tests for the pluslink-e2e binary
//!
//! None of these launch a browser: they cover argument handling, the
//! `list` and `config` commands, and the errors `run` reports before launch.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn pluslink() -> Command {
    let mut cmd = Command::cargo_bin("pluslink-e2e").expect("pluslink-e2e binary should exist");
    cmd.env_remove("PLUSLINK_BASE_URL").env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    pluslink()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    pluslink()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    pluslink().assert().failure();
}

#[test]
fn test_unknown_flag_fails() {
    pluslink().args(["run", "--no-such-flag"]).assert().failure();
}

#[test]
fn test_run_help_lists_harness_flags() {
    pluslink()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--fail-fast"))
        .stdout(predicate::str::contains("--junit"))
        .stdout(predicate::str::contains("PLUSLINK_BASE_URL"));
}

// ============================================================================
// list
// ============================================================================

#[test]
fn test_list_builtin_suite() {
    pluslink()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("plus-code-links (5 cases)"))
        .stdout(predicate::str::contains("/#12345678+90"))
        .stdout(predicate::str::contains("/#86x4rv66+99"))
        .stdout(predicate::str::contains("button \"Apple Maps\""));
}

#[test]
fn test_list_with_filter() {
    pluslink()
        .args(["list", "--filter", "Waze"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 cases)"))
        .stdout(predicate::str::contains("Google Maps").not());
}

#[test]
fn test_list_suite_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("suite.yaml");
    fs::write(
        &path,
        r#"version: "1.0"
name: smoke
cases:
  - name: fallback button
    target: "/#not-a-code"
    expect: { role: button, name: "Locate Me" }
"#,
    )
    .unwrap();

    pluslink()
        .args(["list", "--suite"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("smoke (1 cases)"))
        .stdout(predicate::str::contains("/#not-a-code"));
}

#[test]
fn test_list_invalid_suite_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("suite.yaml");
    fs::write(&path, "version: \"1.0\"\nname: empty\ncases: []\n").unwrap();

    pluslink()
        .args(["list", "--suite"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no cases"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_prints_defaults() {
    pluslink()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:4173"))
        .stdout(predicate::str::contains("timeout_ms: 5000"));
}

#[test]
fn test_config_layers_file_env_and_flags() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("harness.yaml");
    fs::write(&path, "jobs: 3\nrepeat: 2\n").unwrap();

    pluslink()
        .env("PLUSLINK_BASE_URL", "http://env.test:8080")
        .args(["config", "--config"])
        .arg(&path)
        .args(["--repeat", "4", "--no-sandbox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://env.test:8080"))
        .stdout(predicate::str::contains("jobs: 3"))
        .stdout(predicate::str::contains("repeat: 4"))
        .stdout(predicate::str::contains("sandbox: false"));
}

#[test]
fn test_config_no_fail_fast_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("harness.yaml");
    fs::write(&path, "fail_fast: true\n").unwrap();

    pluslink()
        .args(["config", "--config"])
        .arg(&path)
        .arg("--no-fail-fast")
        .assert()
        .success()
        .stdout(predicate::str::contains("fail_fast: false"));
}

// ============================================================================
// run (errors raised before any browser is launched)
// ============================================================================

#[test]
fn test_run_rejects_invalid_base_url() {
    pluslink()
        .args(["run", "--base-url", "localhost:4173"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_run_rejects_zero_timeout() {
    pluslink()
        .args(["run", "--timeout", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_ms"));
}

#[test]
fn test_run_missing_suite_file_fails() {
    pluslink()
        .args(["run", "--suite", "/nonexistent/suite.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Suite error"));
}
