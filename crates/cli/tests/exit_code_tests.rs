//! Integration tests for CLI exit codes.
//!
//! Responsibilities:
//! - Prove that load failures map to the documented exit codes.
//! - Prove that stdout stays empty when loading fails.

mod common;

use common::{config_cmd, config_cmd_in, config_dir};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_missing_production_file_exits_not_found() {
    let dir = TempDir::new().unwrap();

    config_cmd_in(dir.path())
        .args(["--env", "production", "show"])
        .assert()
        .failure()
        .code(4)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("production.config.json"));
}

#[test]
fn test_missing_environment_file_can_be_allowed() {
    let dir = config_dir(&[("production", json!({"a": 1}))]);

    config_cmd_in(dir.path())
        .args(["--env", "qa", "show"])
        .assert()
        .failure()
        .code(4);

    config_cmd_in(dir.path())
        .args(["--env", "qa", "--allow-missing-env-file", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"-not set-\""));
}

#[test]
fn test_invalid_json_exits_validation_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("production.config.json"), "{ broken").unwrap();

    config_cmd_in(dir.path())
        .args(["--env", "production", "show"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("is not valid JSON"));
}

#[test]
fn test_required_local_file_missing_fails() {
    let dir = config_dir(&[("production", json!({}))]);

    config_cmd_in(dir.path())
        .args(["--env", "production", "--require-local", "show"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("local.config.json"));
}

#[test]
fn test_malformed_map_flag_is_usage_error() {
    config_cmd()
        .args(["--map", "NOT_A_PAIR", "show"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("expected VAR=path"));
}
