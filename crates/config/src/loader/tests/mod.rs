//! Tests for the configuration snapshot builder.
//!
//! Responsibilities:
//! - Test file planning, merge precedence, and tolerated/fatal missing files.
//! - Test the environment-variable overlay and coercion through the builder.
//! - Test dotenv preloading.
//!
//! Invariants:
//! - Tests that touch process env or cwd hold `env_lock()` and run `#[serial]`.
//! - Tests pass an explicit environment unless they exercise the `APP_ENV` fallback.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::TempDir;


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// A temp directory pre-populated with `production.config.json`.
pub fn config_dir(production: serde_json::Value) -> TempDir {
    let dir = TempDir::new().unwrap();
    write(&dir, "production", production);
    dir
}

pub fn write(dir: &TempDir, name: &str, contents: serde_json::Value) {
    crate::test_util::write_config(dir.path(), name, &contents);
}

pub fn dir_path(dir: &TempDir) -> PathBuf {
    dir.path().to_path_buf()
}
