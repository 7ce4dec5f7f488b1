//! Configuration type definitions.
//!
//! Responsibilities:
//! - Define the caller-facing and resolved loader options.
//! - Define build metadata (`Meta`, `PlannedFile`) and the raw file record (`RawFiles`).
//!
//! Does NOT handle:
//! - Loading or merging configuration (see `loader` module).
//! - Caching or sharing built configs (see `registry` module).
//!
//! Invariants:
//! - Option types are serde-serialisable so `inspect()` snapshots can be logged or printed.
//! - `FileKind` serializes as its plain label (`production`, `local`, the environment name).

mod meta;
mod options;

pub use meta::{FileKind, Meta, PlannedFile, RawFiles};
pub use options::{
    ConfigOptions, EnvironmentVariables, MissingFilePolicy, ResolvedOptions,
    default_environment_levels,
};
