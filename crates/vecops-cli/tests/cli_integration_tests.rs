//! CLI integration tests using `assert_cmd`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the CLI binary command
#[allow(deprecated)]
fn vecops_cmd() -> Command {
    let mut cmd = Command::cargo_bin("vecops").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("VECOPS_CONFIG")
        .env_remove("VECOPS_DISPATCH__MAX_TIER");
    cmd
}

// =============================================================================
// Help & Version Tests
// =============================================================================

#[test]
fn test_help_displays_usage() {
    vecops_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("bench"));
}

#[test]
fn test_version_displays_version() {
    vecops_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vecops"));
}

#[test]
fn test_invalid_command_shows_error() {
    vecops_cmd()
        .arg("invalid_command_xyz")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// =============================================================================
// Info Command Tests
// =============================================================================

#[test]
fn test_info_prints_dispatch() {
    vecops_cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("SIMD Dispatch Info:"))
        .stdout(predicate::str::contains("Scalar"));
}

#[test]
fn test_info_json() {
    let output = vecops_cmd().args(["info", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tiers = value["available_tiers"].as_array().unwrap();
    assert_eq!(tiers.last().and_then(|t| t.as_str()), Some("Scalar"));
    assert!(value["inner_product"].is_string());
}

#[test]
fn test_config_caps_dispatch() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("vecops.toml");
    fs::write(&config_path, "[dispatch]\nmax_tier = \"scalar\"\n").unwrap();

    let output = vecops_cmd()
        .arg("--config")
        .arg(&config_path)
        .args(["info", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["inner_product"], "Scalar");
    assert_eq!(value["max_tier"], "Scalar");
}

#[test]
fn test_env_caps_dispatch() {
    let output = vecops_cmd()
        .env("VECOPS_DISPATCH__MAX_TIER", "portable")
        .args(["info", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["l2_distance_squared"], "Portable");
}

#[test]
fn test_env_cap_accepts_display_name() {
    let output = vecops_cmd()
        .env("VECOPS_DISPATCH__MAX_TIER", "PORTABLE")
        .args(["info", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["inner_product"], "Portable");
    assert_eq!(value["max_tier"], "Portable");
}

#[test]
fn test_env_unknown_tier_fails_with_code() {
    vecops_cmd()
        .env("VECOPS_DISPATCH__MAX_TIER", "sse4")
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("VECOPS-003"));
}

#[test]
fn test_missing_config_file_fails() {
    let temp_dir = TempDir::new().unwrap();

    vecops_cmd()
        .arg("--config")
        .arg(temp_dir.path().join("absent.toml"))
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_bad_log_level_fails() {
    vecops_cmd()
        .args(["--log-level", "loud", "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("logging.level"));
}

// =============================================================================
// Bench Command Tests
// =============================================================================

#[test]
fn test_bench_l2() {
    vecops_cmd()
        .args(["bench", "--dim", "64", "--iters", "100", "--metric", "l2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("metric=l2 dim=64 iters=100"))
        .stdout(predicate::str::contains("ns/call"));
}

#[test]
fn test_bench_ip_default() {
    vecops_cmd()
        .args(["bench", "--dim", "33", "--iters", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("metric=ip"));
}

#[test]
fn test_bench_zero_iters_rejected() {
    vecops_cmd()
        .args(["bench", "--iters", "0"])
        .assert()
        .failure();
}

#[test]
fn test_bench_unknown_metric_rejected() {
    vecops_cmd()
        .args(["bench", "--metric", "cosine"])
        .assert()
        .failure();
}
