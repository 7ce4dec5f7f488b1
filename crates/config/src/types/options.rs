//! Loader option types.
//!
//! Responsibilities:
//! - Define `ConfigOptions`, the caller-facing, partially-specified option set.
//! - Define `ResolvedOptions`, the concrete option set recorded with every build.
//! - Provide builder-style setters so callers only name what they change.
//!
//! Does NOT handle:
//! - Resolving defaults against the process environment (see `loader::builder`).
//!
//! Invariants:
//! - `ResolvedOptions::directory` is absolute and `environment` is non-empty.
//! - `ResolvedOptions::local_config_files` holds no duplicates and keeps first-seen order.
//! - Converting `ResolvedOptions` back into `ConfigOptions` and resolving again is a no-op.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ENVIRONMENT_LEVELS, DEFAULT_LOCAL_CONFIG_FILE};

/// What to do when the environment-specific file is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFilePolicy {
    /// A missing file aborts the build.
    #[default]
    Fatal,
    /// A missing file is skipped and contributes nothing.
    Skip,
}

/// Environment-variable overlay settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentVariables {
    /// Preload a dotenv file before reading mapped variables.
    pub enable_dotenv: bool,
    /// Dotenv file to preload; `.env` in the working directory when unset.
    pub dotenv_path: Option<PathBuf>,
    /// External variable name -> dotted config path.
    pub mapping: BTreeMap<String, String>,
}

/// Options supplied by callers when initialising or rebuilding a config.
///
/// Every field has a default, so callers usually start from
/// `ConfigOptions::new()` and chain the setters they need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOptions {
    /// Config directory; relative paths resolve against the working directory.
    pub directory: Option<PathBuf>,
    /// Environment name; falls back to `APP_ENV`, then `development`.
    pub environment: Option<String>,
    /// Use `{name}.json` instead of `{name}.config.json`.
    pub short_filenames: bool,
    /// Environment ordinals used for the `env.level` stamp. `None` disables the stamp.
    pub environment_levels: Option<BTreeMap<String, i64>>,
    /// Extra files merged after the environment file, in order.
    pub local_config_files: Vec<String>,
    /// Treat a missing local file as fatal.
    pub require_local_config: bool,
    pub environment_variables: EnvironmentVariables,
    /// Consumer views are detached deep copies.
    pub immutable: bool,
    /// Consumer views carry no utility operations.
    pub plain: bool,
    /// Load exactly this one file instead of the production/environment/local chain.
    pub single_file: Option<String>,
    pub missing_environment_file: MissingFilePolicy,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            directory: None,
            environment: None,
            short_filenames: false,
            environment_levels: Some(default_environment_levels()),
            local_config_files: vec![DEFAULT_LOCAL_CONFIG_FILE.to_string()],
            require_local_config: false,
            environment_variables: EnvironmentVariables::default(),
            immutable: false,
            plain: false,
            single_file: None,
            missing_environment_file: MissingFilePolicy::default(),
        }
    }
}

/// The default `{production: 1, staging: 2, development: 3}` ordinals.
pub fn default_environment_levels() -> BTreeMap<String, i64> {
    DEFAULT_ENVIRONMENT_LEVELS
        .iter()
        .map(|(name, level)| (name.to_string(), *level))
        .collect()
}

impl ConfigOptions {
    /// Create the default option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the config directory.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Set the environment name.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_short_filenames(mut self, short: bool) -> Self {
        self.short_filenames = short;
        self
    }

    /// Replace the environment ordinals.
    pub fn with_environment_levels<I, K>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        self.environment_levels = Some(levels.into_iter().map(|(k, v)| (k.into(), v)).collect());
        self
    }

    /// Disable the synthesized `env` stamp.
    pub fn without_environment_levels(mut self) -> Self {
        self.environment_levels = None;
        self
    }

    /// Replace the list of local files.
    pub fn with_local_config_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.local_config_files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Append one local file to the list.
    pub fn add_local_config_file(mut self, file: impl Into<String>) -> Self {
        self.local_config_files.push(file.into());
        self
    }

    pub fn with_require_local_config(mut self, require: bool) -> Self {
        self.require_local_config = require;
        self
    }

    /// Map an external environment variable onto a dotted config path.
    pub fn with_env_mapping(mut self, variable: impl Into<String>, path: impl Into<String>) -> Self {
        self.environment_variables
            .mapping
            .insert(variable.into(), path.into());
        self
    }

    /// Preload a dotenv file before the overlay; `None` uses `.env` in the working directory.
    pub fn with_dotenv(mut self, path: Option<PathBuf>) -> Self {
        self.environment_variables.enable_dotenv = true;
        self.environment_variables.dotenv_path = path;
        self
    }

    pub fn with_immutable(mut self, immutable: bool) -> Self {
        self.immutable = immutable;
        self
    }

    pub fn with_plain(mut self, plain: bool) -> Self {
        self.plain = plain;
        self
    }

    /// Load exactly one named file.
    pub fn with_single_file(mut self, name: impl Into<String>) -> Self {
        self.single_file = Some(name.into());
        self
    }

    pub fn with_missing_environment_file(mut self, policy: MissingFilePolicy) -> Self {
        self.missing_environment_file = policy;
        self
    }
}

/// The concrete options a snapshot was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOptions {
    pub directory: PathBuf,
    pub environment: String,
    pub short_filenames: bool,
    pub environment_levels: Option<BTreeMap<String, i64>>,
    pub local_config_files: Vec<String>,
    pub require_local_config: bool,
    pub environment_variables: EnvironmentVariables,
    pub immutable: bool,
    pub plain: bool,
    pub single_file: Option<String>,
    pub missing_environment_file: MissingFilePolicy,
}

impl From<ResolvedOptions> for ConfigOptions {
    fn from(resolved: ResolvedOptions) -> Self {
        Self {
            directory: Some(resolved.directory),
            environment: Some(resolved.environment),
            short_filenames: resolved.short_filenames,
            environment_levels: resolved.environment_levels,
            local_config_files: resolved.local_config_files,
            require_local_config: resolved.require_local_config,
            environment_variables: resolved.environment_variables,
            immutable: resolved.immutable,
            plain: resolved.plain,
            single_file: resolved.single_file,
            missing_environment_file: resolved.missing_environment_file,
        }
    }
}
