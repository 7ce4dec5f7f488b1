//! Shared test utilities for layered-config CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Provide a temp config directory builder.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper will be hermetic by default.
//! - `APP_ENV` is cleared so the environment comes from `--env` or the default.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Returns a hermetic `layered-config` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - `APP_ENV` and `RUST_LOG` are cleared to ensure no leakage from the host.
pub fn config_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("layered-config");

    cmd.env("DOTENV_DISABLED", "1");
    cmd.env_remove("APP_ENV").env_remove("RUST_LOG");

    cmd
}

/// Returns a hermetic command already pointed at `dir`.
pub fn config_cmd_in(dir: &Path) -> Command {
    let mut cmd = config_cmd();
    cmd.arg("--dir").arg(dir);
    cmd
}

/// Creates a config directory holding the given `(name, contents)` files.
pub fn config_dir(files: &[(&str, Value)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, contents) in files {
        write_config(dir.path(), name, contents);
    }
    dir
}

pub fn write_config(dir: &Path, name: &str, contents: &Value) {
    fs::write(
        dir.join(format!("{name}.config.json")),
        serde_json::to_string_pretty(contents).unwrap(),
    )
    .unwrap();
}

/// Parses a command's stdout as a single JSON document.
pub fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}
