//! Layered JSON configuration for Rust services.
//!
//! This crate loads a directory of environment-named JSON files
//! (`production.config.json`, `{environment}.config.json`, local overrides),
//! merges them with mapped environment variables, and caches the result per
//! config id so any part of a process can reuse, reload, or inspect it.
//!
//! The registry is safe to share across threads. Values read from a view are
//! immutable snapshots, so holding one never blocks a reload.

pub mod constants;
mod loader;
mod registry;
pub mod types;

use std::sync::LazyLock;

pub use loader::{ConfigBuilder, ConfigError, coerce_env_value, env_var_or_none};
pub use registry::{ConfigView, Inspection, Registry, SharingMode};
pub use types::{
    ConfigOptions, EnvironmentVariables, FileKind, Meta, MissingFilePolicy, PlannedFile,
    RawFiles, ResolvedOptions,
};

static DEFAULT_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// The process-wide registry used by [`init`], [`use_config`] and [`wipe`].
pub fn default_registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}

/// Build and cache `config_id` in the default registry.
#[track_caller]
pub fn init(config_id: &str, options: ConfigOptions) -> Result<ConfigView, ConfigError> {
    DEFAULT_REGISTRY.init(config_id, options)
}

/// Fetch a view of `config_id` from the default registry.
pub fn use_config(
    config_id: &str,
    immutable: Option<bool>,
    plain: Option<bool>,
) -> Result<ConfigView, ConfigError> {
    DEFAULT_REGISTRY.use_config(config_id, immutable, plain)
}

/// Remove `config_id` from the default registry.
pub fn wipe(config_id: &str) -> Result<(), ConfigError> {
    DEFAULT_REGISTRY.wipe(config_id)
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::path::Path;
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    /// Write `{name}.config.json` into `dir`.
    pub fn write_config(dir: &Path, name: &str, contents: &serde_json::Value) {
        std::fs::write(dir.join(format!("{name}.config.json")), contents.to_string()).unwrap();
    }
}
