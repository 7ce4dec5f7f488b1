//! Configuration loader for environment-named JSON files.
//!
//! Responsibilities:
//! - Build one merged configuration snapshot from a directory of JSON files.
//! - Overlay mapped environment variables (optionally preloaded from a `.env` file).
//!
//! Does NOT handle:
//! - Caching snapshots or handing them to consumers (see `registry`).
//!
//! Invariants / Assumptions:
//! - Merge order is production, environment, local files, then the environment overlay.
//! - The `DOTENV_DISABLED` variable is checked before any dotenv file is read.

mod builder;
mod env;
mod error;
pub(crate) mod merge;

pub use builder::ConfigBuilder;
pub(crate) use builder::Snapshot;
pub use env::{coerce_env_value, env_var_or_none};
pub use error::ConfigError;

#[cfg(test)]
mod tests;
