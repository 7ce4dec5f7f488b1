//! Environment-variable overlay for configuration.
//!
//! Responsibilities:
//! - Preload a dotenv file when the options ask for one.
//! - Read each mapped process environment variable and coerce its string value.
//! - Write coerced values into the merged config at their dotted paths.
//!
//! Does NOT handle:
//! - Selecting the active environment (see builder.rs).
//! - Merging config files (see merge.rs).
//!
//! Invariants:
//! - The overlay runs after the file merge, so mapped values always win.
//! - The environment selector variable (`APP_ENV`) is never written by the overlay.
//! - Unset variables leave the merged config untouched at their path.
//! - The `DOTENV_DISABLED` variable is checked before any dotenv file is read.

use std::ffi::OsString;

use serde_json::{Number, Value};

use super::error::ConfigError;
use super::merge::{set_path, split_path};
use crate::constants::{DOTENV_DISABLED_VAR, ENVIRONMENT_VAR};
use crate::types::EnvironmentVariables;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Converts string forms of booleans, null, integers and decimals to JSON
/// values. Anything else is returned as a JSON string, unchanged.
///
/// Literal matching is case-insensitive (`TRUE`, `Null`).
pub fn coerce_env_value(input: &str) -> Value {
    if input.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if input.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if input.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if let Some(number) = parse_decimal(input) {
        return Value::Number(number);
    }
    Value::String(input.to_string())
}

/// Parses `digits` or `digits.digits`. Signs, exponents and bare dots are rejected.
fn parse_decimal(input: &str) -> Option<Number> {
    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (input, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !fraction.is_none_or(all_digits) {
        return None;
    }

    if fraction.is_none()
        && let Ok(integer) = whole.parse::<u64>()
    {
        return Some(Number::from(integer));
    }
    input.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Check if dotenv loading is disabled via environment variable.
fn dotenv_disabled() -> bool {
    matches!(
        std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
        Some("true") | Some("1")
    )
}

/// Load the configured dotenv file into the process environment.
///
/// Variables already present in the process environment are not overridden.
///
/// # Errors
///
/// Any failure to load a requested file is fatal, including a missing file:
/// - invalid syntax (`ConfigError::DotenvParse`)
/// - I/O errors (`ConfigError::DotenvIo`)
///
/// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
pub(crate) fn load_dotenv(settings: &EnvironmentVariables) -> Result<(), ConfigError> {
    if dotenv_disabled() {
        tracing::debug!("dotenv preload disabled via {}", DOTENV_DISABLED_VAR);
        return Ok(());
    }

    let result = match &settings.dotenv_path {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };

    match result {
        Ok(()) => Ok(()),
        Err(dotenvy::Error::LineParse(_, idx)) => {
            Err(ConfigError::DotenvParse { error_index: idx })
        }
        Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
            kind: io_err.kind(),
        }),
        Err(_) => Err(ConfigError::DotenvUnknown),
    }
}

/// Apply mapped environment variables on top of the merged config.
pub(crate) fn apply_env_mapping(
    values: &mut Value,
    settings: &EnvironmentVariables,
) -> Result<(), ConfigError> {
    if settings.mapping.is_empty() {
        return Ok(());
    }

    if settings.enable_dotenv {
        load_dotenv(settings)?;
    }

    for (variable, path) in &settings.mapping {
        if variable == ENVIRONMENT_VAR {
            continue;
        }

        let segments = split_path(path).ok_or_else(|| ConfigError::InvalidMappingPath {
            var: variable.clone(),
            path: path.clone(),
        })?;

        let raw = match std::env::var_os(variable) {
            Some(raw) => raw,
            None => continue,
        };

        let Some(value) = read_os_value(variable, raw) else {
            continue;
        };

        tracing::debug!(variable = %variable, path = %path, "applying environment variable");
        set_path(values, &segments, coerce_env_value(&value));
    }

    Ok(())
}

fn read_os_value(variable: &str, raw: OsString) -> Option<String> {
    match raw.into_string() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = %variable, "ignoring environment variable with non-UTF-8 value");
            None
        }
    }
}
