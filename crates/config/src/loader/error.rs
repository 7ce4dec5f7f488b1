//! Error types for configuration loading and registry operations.
//!
//! Responsibilities:
//! - Define one error type covering every failure the builder and registry raise.
//! - Render human-readable messages that name the file, path, or config id involved.
//!
//! Does NOT handle:
//! - Recovery. Every variant is fatal to the call that produced it.
//!
//! Invariants:
//! - Read failures include the attempted path and the OS error kind/code.
//! - Parse failures include the logical file name and the parser detail.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or managing a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("You must provide a valid config id")]
    MissingConfigId,

    #[error("The config \"{0}\" already exists. Use it, or wipe it before initialising it again")]
    AlreadyExists(String),

    #[error("The config \"{0}\" has not been initialised yet")]
    NotInitialised(String),

    /// A required config file could not be read.
    #[error(
        "Unable to read {} config \"{}\" from path \"{}\" ({})",
        .kind,
        .name,
        .path.display(),
        describe_io_error(.source)
    )]
    FileRead {
        kind: String,
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file was read but does not contain valid JSON.
    #[error("The {kind} config \"{name}\" is not valid JSON ({source})")]
    FileParse {
        kind: String,
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    ///
    /// SAFETY: This error does not include any raw dotenv content.
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,

    #[error("{operation} requires a target environment")]
    MissingTargetEnvironment { operation: &'static str },

    #[error("Invalid local config file name: \"{0}\"")]
    InvalidLocalFile(String),

    #[error("There is no raw config named \"{0}\"")]
    RawFileNotFound(String),

    #[error("Invalid config path \"{path}\" mapped from environment variable {var}")]
    InvalidMappingPath { var: String, path: String },

    #[error("Invalid config path \"{0}\"")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A utility operation was called on a view created in plain mode.
    #[error("The view of config \"{0}\" is plain and carries no utility operations")]
    PlainView(String),
}

/// Formats an I/O error as its kind plus the raw OS code when one exists.
fn describe_io_error(err: &std::io::Error) -> String {
    match err.raw_os_error() {
        Some(code) => format!("{:?}, os error {code}", err.kind()),
        None => format!("{:?}", err.kind()),
    }
}
