//! layered-config - inspect layered JSON configuration from the command line.
//!
//! Responsibilities:
//! - Parse command-line arguments.
//! - Load the configuration through the shared library and print it as JSON.
//!
//! Does NOT handle:
//! - File planning, merging, or environment overlays (see `crates/config`).
//!
//! Invariants:
//! - Logs go to stderr so stdout always holds a single JSON document.
//! - Dotenv files are only read when `--dotenv` is passed.

mod args;
mod commands;
mod error;

use args::Cli;
use clap::Parser;
use commands::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let code = match run(&cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.exit_code()
        }
    };
    std::process::exit(code.as_i32());
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let output = run_command(&cli.command, cli.config_options())?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
