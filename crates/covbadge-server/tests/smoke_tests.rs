//! Smoke tests for the covbadge binary
//!
//! These tests verify the CLI surface without binding a port.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command for the covbadge binary
fn covbadge() -> Command {
    Command::cargo_bin("covbadge").expect("covbadge binary should exist")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    covbadge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    covbadge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("percent"))
        .stdout(predicate::str::contains("badge-url"));
}

// ============================================================================
// Percent
// ============================================================================

#[test]
fn test_percent_combined() {
    // 5 of 8 statements: 62.5 rounds half to even
    covbadge()
        .args(["percent", fixture("coverage.out").to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("62% (yellow)"))
        .stdout(predicate::str::contains("main.go  71.4%  5/7"))
        .stdout(predicate::str::contains("util.go  0.0%  0/1"));
}

#[test]
fn test_percent_first() {
    covbadge()
        .args(["percent", "--selection", "first"])
        .arg(fixture("coverage.out"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("71% (yellow)"))
        .stdout(predicate::str::contains("util.go").not());
}

#[test]
fn test_percent_single_rejects_multi_file_profile() {
    covbadge()
        .args(["percent", "--selection", "single"])
        .arg(fixture("coverage.out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 files"));
}

#[test]
fn test_percent_json() {
    let output = covbadge()
        .args(["percent", "--json"])
        .arg(fixture("coverage.out"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["rounded_percent"], 62);
    assert_eq!(summary["status"], "yellow");
    assert_eq!(summary["files"], 2);
    assert_eq!(summary["selection"], "combined");
}

#[test]
fn test_percent_malformed_profile_fails() {
    covbadge()
        .arg("percent")
        .arg(fixture("malformed.out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn test_percent_missing_file_fails() {
    covbadge()
        .args(["percent", "/nonexistent/coverage.out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

// ============================================================================
// Badge URL
// ============================================================================

#[test]
fn test_badge_url() {
    covbadge()
        .args(["badge-url", "--shield", "https://img.shields.io/badge"])
        .arg(fixture("coverage.out"))
        .assert()
        .success()
        .stdout("https://img.shields.io/badge/coverage-62%25-yellow.svg\n");
}

// ============================================================================
// Serve configuration
// ============================================================================

#[test]
fn test_serve_missing_config_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    covbadge()
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("conf.json"));
}

#[test]
fn test_serve_invalid_config_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.json");
    fs::write(&config, r#"{"listenPort": "not-a-port", "shieldServerURL": "http://x"}"#).unwrap();

    covbadge()
        .args(["-c", config.to_str().unwrap(), "serve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("listenPort"));
}

#[test]
fn test_serve_config_missing_shield_url_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("conf.json");
    fs::write(&config, r#"{"listenPort": "8080"}"#).unwrap();

    covbadge()
        .current_dir(dir.path())
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("shieldServerURL"));
}
