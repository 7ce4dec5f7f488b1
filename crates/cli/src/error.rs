//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `ConfigError` variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit code 2 is left to clap for usage errors.

use layered_config::ConfigError;

/// Structured exit codes for layered-config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// A config file, raw file, or value path does not exist.
    NotFound = 4,

    /// A config file, dotenv file, or option is malformed.
    ///
    /// Scripts should fix the input and not retry.
    ValidationError = 5,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::FileRead { source, .. }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                ExitCode::NotFound
            }
            ConfigError::DotenvIo {
                kind: std::io::ErrorKind::NotFound,
            } => ExitCode::NotFound,
            ConfigError::RawFileNotFound(_) => ExitCode::NotFound,

            ConfigError::FileParse { .. }
            | ConfigError::DotenvParse { .. }
            | ConfigError::InvalidLocalFile(_)
            | ConfigError::InvalidMappingPath { .. }
            | ConfigError::InvalidPath(_)
            | ConfigError::MissingConfigId
            | ConfigError::MissingTargetEnvironment { .. } => ExitCode::ValidationError,

            _ => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no `ConfigError` is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<ConfigError>())
            .map(ExitCode::from)
            .unwrap_or(ExitCode::GeneralError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_as_i32() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::NotFound.as_i32(), 4);
        assert_eq!(ExitCode::ValidationError.as_i32(), 5);
    }

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let err = ConfigError::FileRead {
            kind: "production".to_string(),
            name: "production".to_string(),
            path: "/tmp/production.config.json".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(ExitCode::from(&err), ExitCode::NotFound);
    }

    #[test]
    fn test_exit_code_found_through_context() {
        let err: anyhow::Error = Err::<(), _>(ConfigError::InvalidPath("a..b".to_string()))
            .context("failed to load")
            .unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::ValidationError);
    }

    #[test]
    fn test_other_errors_are_general() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(err.exit_code(), ExitCode::GeneralError);
        assert_eq!(
            ExitCode::from(&ConfigError::AlreadyExists("app".to_string())),
            ExitCode::GeneralError
        );
    }
}
