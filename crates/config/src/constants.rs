//! Centralized constants for the layered configuration loader.
//!
//! This module contains the default values and reserved names shared by the
//! builder and the registry.

// =============================================================================
// File Discovery
// =============================================================================

/// Directory searched for config files when none is given, relative to the
/// process working directory.
pub const DEFAULT_CONFIG_DIR: &str = "./config";

/// Environment used when neither the caller nor `APP_ENV` selects one.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Name of the environment that is always loaded first.
pub const PRODUCTION_ENVIRONMENT: &str = "production";

/// Local override file merged after the environment file by default.
pub const DEFAULT_LOCAL_CONFIG_FILE: &str = "local";

/// Infix placed between the logical name and `.json` unless short filenames
/// are requested (`production.config.json` vs `production.json`).
pub const CONFIG_FILENAME_INFIX: &str = ".config";

/// File extension of every config file.
pub const CONFIG_FILE_EXTENSION: &str = "json";

// =============================================================================
// Environment Variables
// =============================================================================

/// Process environment variable selecting the active environment.
///
/// This name is reserved: the environment-variable overlay never writes it
/// into the merged config even when a mapping names it.
pub const ENVIRONMENT_VAR: &str = "APP_ENV";

/// Setting this variable to `1` or `true` skips any dotenv preload.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";

// =============================================================================
// Environment Stamp
// =============================================================================

/// Top-level key holding the synthesized `{id, level}` environment stamp.
pub const ENV_STAMP_KEY: &str = "env";

/// Level recorded in the environment stamp when the active environment has
/// no configured ordinal.
pub const LEVEL_NOT_SET: &str = "-not set-";

/// Default environment ordinals stamped into `env.level`.
pub const DEFAULT_ENVIRONMENT_LEVELS: [(&str, i64); 3] =
    [("production", 1), ("staging", 2), ("development", 3)];
