//! Subcommand execution.
//!
//! Responsibilities:
//! - Load the configuration described by the global flags.
//! - Produce the JSON document each subcommand prints.
//!
//! Does NOT handle:
//! - Argument parsing (see `args`).
//! - Exit code selection (see `error`).

use anyhow::{Context, Result};
use layered_config::{ConfigOptions, ConfigView};
use serde_json::Value;

use crate::args::Commands;

/// Registry id the CLI loads its single configuration under.
pub const CLI_CONFIG_ID: &str = "cli";

/// Load the configuration and render the output for `command`.
pub fn run_command(command: &Commands, options: ConfigOptions) -> Result<Value> {
    let view = layered_config::init(CLI_CONFIG_ID, options)
        .context("Failed to load configuration")?;
    tracing::debug!(
        environment = %view.inspect()?.options.environment,
        "configuration loaded"
    );
    render(command, &view)
}

fn render(command: &Commands, view: &ConfigView) -> Result<Value> {
    let output = match command {
        Commands::Show { path: None } => view.snapshot(),
        Commands::Show { path: Some(path) } => view
            .get(path)
            .with_context(|| format!("No value at path \"{path}\""))?,
        Commands::Raw { name } => view.raw_files(name.as_deref())?,
        Commands::Inspect => serde_json::to_value(view.inspect()?)?,
        Commands::Env { name } => view
            .get_for_environment(name)
            .with_context(|| format!("Failed to load environment \"{name}\""))?,
    };
    Ok(output)
}
