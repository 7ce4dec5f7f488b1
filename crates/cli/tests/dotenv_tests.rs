//! Integration tests for `--dotenv` handling in the CLI.
//!
//! Responsibilities:
//! - Prove that a dotenv file feeds mapped variables when requested.
//! - Prove that an invalid dotenv file fails without leaking secrets.
//! - Ensure DOTENV_DISABLED=1 skips a requested dotenv file.
//!
//! Invariants:
//! - Tests must explicitly clear `DOTENV_DISABLED` to enable dotenv loading.

mod common;

use std::fs;

use common::{config_cmd_in, config_dir, stdout_json};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_dotenv_feeds_mapped_variables() {
    let dir = config_dir(&[("production", json!({"db": {"user": "app"}}))]);
    let env_dir = TempDir::new().unwrap();
    let env_path = env_dir.path().join("vars.env");
    fs::write(&env_path, "_LC_CLI_DB_USER=reporting\n").unwrap();

    let output = config_cmd_in(dir.path())
        .env_remove("DOTENV_DISABLED")
        .env_remove("_LC_CLI_DB_USER")
        .arg(format!("--dotenv={}", env_path.display()))
        .args(["--env", "production", "--map", "_LC_CLI_DB_USER=db.user", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["db"]["user"], json!("reporting"));
}

#[test]
fn test_default_dotenv_is_read_from_working_directory() {
    let dir = config_dir(&[("production", json!({}))]);
    let work_dir = TempDir::new().unwrap();
    fs::write(work_dir.path().join(".env"), "_LC_CLI_FLAG=true\n").unwrap();

    let output = config_cmd_in(dir.path())
        .current_dir(work_dir.path())
        .env_remove("DOTENV_DISABLED")
        .env_remove("_LC_CLI_FLAG")
        .args(["--dotenv", "--env", "production", "--map", "_LC_CLI_FLAG=flag", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["flag"], json!(true));
}

#[test]
fn test_invalid_dotenv_does_not_leak_secrets() {
    let dir = config_dir(&[("production", json!({}))]);
    let env_dir = TempDir::new().unwrap();
    let env_path = env_dir.path().join(".env");
    let secret_value = "supersecret_cli_token_12345";
    fs::write(&env_path, format!("_LC_CLI_TOKEN={secret_value}\nINVALID_LINE")).unwrap();

    config_cmd_in(dir.path())
        .env_remove("DOTENV_DISABLED")
        .env_remove("_LC_CLI_TOKEN")
        .arg(format!("--dotenv={}", env_path.display()))
        .args(["--env", "production", "--map", "_LC_CLI_TOKEN=token", "show"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains(".env"))
        .stderr(predicate::str::contains(secret_value).not());
}

#[test]
fn test_dotenv_disabled_skips_requested_file() {
    let dir = config_dir(&[("production", json!({"token": "file"}))]);
    let env_dir = TempDir::new().unwrap();
    let env_path = env_dir.path().join(".env");
    fs::write(&env_path, "INVALID_LINE").unwrap();

    let output = config_cmd_in(dir.path())
        .env("DOTENV_DISABLED", "1")
        .env_remove("_LC_CLI_TOKEN")
        .arg(format!("--dotenv={}", env_path.display()))
        .args(["--env", "production", "--map", "_LC_CLI_TOKEN=token", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["token"], json!("file"));
}
