//! Command-line argument definitions for the layered-config CLI.
//!
//! Responsibilities:
//! - Define the top-level `Cli` struct and `Commands` enum using clap derive.
//! - Translate loader flags into a `ConfigOptions` value.
//!
//! Does NOT handle:
//! - Loading or printing configuration (see `commands`).
//!
//! Invariants:
//! - `--local` replaces the default local file list; omitting it keeps `local`.
//! - `--map` values are `VAR=path` pairs; malformed pairs are rejected by clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use layered_config::{ConfigOptions, MissingFilePolicy};

/// Layered JSON configuration inspector
#[derive(Parser, Debug)]
#[command(
    name = "layered-config",
    about = "Load and inspect layered JSON configuration",
    version
)]
pub struct Cli {
    /// Directory holding the `*.config.json` files
    #[arg(short, long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Environment to load (falls back to APP_ENV, then `development`)
    #[arg(short, long, global = true, value_name = "NAME")]
    pub env: Option<String>,

    /// Local override file merged after the environment file (repeatable)
    #[arg(long = "local", global = true, value_name = "NAME")]
    pub local: Vec<String>,

    /// Load only this one file instead of the layered chain
    #[arg(long, global = true, value_name = "NAME")]
    pub single: Option<String>,

    /// Use `{name}.json` instead of `{name}.config.json`
    #[arg(long, global = true)]
    pub short_filenames: bool,

    /// Fail when a local override file is missing
    #[arg(long, global = true)]
    pub require_local: bool,

    /// Skip the environment file when it does not exist
    #[arg(long, global = true)]
    pub allow_missing_env_file: bool,

    /// Map an environment variable onto a dotted config path (repeatable)
    #[arg(long = "map", global = true, value_name = "VAR=PATH", value_parser = parse_mapping)]
    pub map: Vec<(String, String)>,

    /// Preload a dotenv file before reading mapped variables (default: ./.env)
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        num_args = 0..=1,
        require_equals = true
    )]
    pub dotenv: Option<Option<PathBuf>>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the merged configuration as JSON
    Show {
        /// Print only the value at this dotted path
        #[arg(long, value_name = "PATH")]
        path: Option<String>,
    },

    /// Print the parsed contents of the loaded files
    Raw {
        /// Print only this file (logical name without extension)
        name: Option<String>,
    },

    /// Print the resolved options and load metadata
    Inspect,

    /// Print the merged configuration another environment would produce
    Env {
        /// Environment name to preview
        name: String,
    },
}

impl Cli {
    /// Build loader options from the global flags.
    pub fn config_options(&self) -> ConfigOptions {
        let mut options = ConfigOptions::new()
            .with_short_filenames(self.short_filenames)
            .with_require_local_config(self.require_local);

        if let Some(dir) = &self.dir {
            options = options.with_directory(dir);
        }
        if let Some(env) = &self.env {
            options = options.with_environment(env);
        }
        if !self.local.is_empty() {
            options = options.with_local_config_files(self.local.iter().cloned());
        }
        if let Some(single) = &self.single {
            options = options.with_single_file(single);
        }
        if self.allow_missing_env_file {
            options = options.with_missing_environment_file(MissingFilePolicy::Skip);
        }
        for (variable, path) in &self.map {
            options = options.with_env_mapping(variable, path);
        }
        if let Some(path) = &self.dotenv {
            options = options.with_dotenv(path.clone());
        }
        options
    }
}

fn parse_mapping(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((variable, path)) if !variable.trim().is_empty() && !path.trim().is_empty() => {
            Ok((variable.trim().to_string(), path.trim().to_string()))
        }
        _ => Err(format!("expected VAR=path, got \"{raw}\"")),
    }
}
