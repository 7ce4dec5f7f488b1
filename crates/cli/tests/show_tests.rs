//! Integration tests for `layered-config show` and `layered-config env`.
//!
//! Responsibilities:
//! - Prove that the merged document is printed as JSON on stdout.
//! - Prove that global flags select the environment, locals, and overlays.

mod common;

use common::{config_cmd_in, config_dir, stdout_json, write_config};
use predicates::prelude::*;
use serde_json::json;

#[test]
fn test_show_prints_merged_config() {
    let dir = config_dir(&[
        ("production", json!({"a": 1, "server": {"host": "prod", "port": 80}})),
        ("staging", json!({"server": {"port": 8080}})),
    ]);

    let output = config_cmd_in(dir.path())
        .args(["--env", "staging", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({
            "a": 1,
            "server": {"host": "prod", "port": 8080},
            "env": {"id": "staging", "level": 2}
        })
    );
}

#[test]
fn test_show_path_prints_single_value() {
    let dir = config_dir(&[("production", json!({"server": {"port": 80}}))]);

    let output = config_cmd_in(dir.path())
        .args(["--env", "production", "show", "--path", "server.port"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output), json!(80));
}

#[test]
fn test_show_missing_path_fails() {
    let dir = config_dir(&[("production", json!({}))]);

    config_cmd_in(dir.path())
        .args(["--env", "production", "show", "--path", "server.port"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("server.port"));
}

#[test]
fn test_env_var_selects_environment() {
    let dir = config_dir(&[
        ("production", json!({})),
        ("staging", json!({"from": "staging"})),
    ]);

    let output = config_cmd_in(dir.path())
        .env("APP_ENV", "staging")
        .arg("show")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["from"], json!("staging"));
}

#[test]
fn test_local_flags_merge_in_order() {
    let dir = config_dir(&[
        ("production", json!({"value": "prod"})),
        ("first", json!({"value": "first"})),
        ("second", json!({"value": "second"})),
    ]);

    let output = config_cmd_in(dir.path())
        .args(["--env", "production", "--local", "first", "--local", "second", "show"])
        .output()
        .unwrap();

    assert_eq!(stdout_json(&output)["value"], json!("second"));
}

#[test]
fn test_map_flag_overlays_environment_variable() {
    let dir = config_dir(&[("production", json!({"server": {"port": 80}}))]);

    let output = config_cmd_in(dir.path())
        .env("_LC_CLI_PORT", "9443")
        .args(["--env", "production", "--map", "_LC_CLI_PORT=server.port", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["server"]["port"], json!(9443));
}

#[test]
fn test_single_file_mode() {
    let dir = config_dir(&[("standalone", json!({"only": true}))]);

    let output = config_cmd_in(dir.path())
        .args(["--env", "production", "--single", "standalone", "show"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({"only": true, "env": {"id": "production", "level": 1}})
    );
}

#[test]
fn test_env_subcommand_previews_other_environment() {
    let dir = config_dir(&[
        ("production", json!({"name": "prod"})),
        ("development", json!({"name": "dev"})),
    ]);
    write_config(dir.path(), "staging", &json!({"name": "staging"}));

    let output = config_cmd_in(dir.path())
        .args(["--env", "development", "env", "staging"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!({"name": "staging", "env": {"id": "staging", "level": 2}})
    );
}
