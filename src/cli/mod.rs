//! CLI module for the Skill Contract Validation Agent
//!
//! This module provides command-line interface functionality for running
//! the specification check battery and validating individual payloads
//! against skill schemas.

pub mod commands;
pub mod output;

pub use commands::{ValidateCli, ValidateCommands};
pub use output::{CheckRunOutput, OutputFormat, PayloadOutput};

use crate::error::ValidationError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution, all checks/validations passed
    Success = 0,
    /// One or more checks or contract validations failed
    ValidationError = 1,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Schema-related errors
    SchemaError = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from an overall pass/fail result
    pub fn from_overall(ok: bool) -> Self {
        if ok {
            ExitCode::Success
        } else {
            ExitCode::ValidationError
        }
    }

    /// Map an error to the exit code it warrants
    pub fn from_error(err: &ValidationError) -> Self {
        match err {
            ValidationError::SchemaNotFound { .. } | ValidationError::SchemaMalformed { .. } => {
                ExitCode::SchemaError
            }
            ValidationError::FileError(_) => ExitCode::FileError,
            ValidationError::InvalidInput(_) | ValidationError::ParseError(_) => {
                ExitCode::InvalidInput
            }
            _ => ExitCode::InternalError,
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: ValidateCli) -> Result<ExitCode, ValidationError> {
    match cli.command {
        ValidateCommands::Check { root, format } => commands::execute_check(root, format),
        ValidateCommands::Validate {
            payload,
            skill,
            direction,
            catalog,
            format,
        } => commands::execute_validate(payload, skill, direction, catalog, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Direction;

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::ValidationError), 1);
        assert_eq!(i32::from(ExitCode::SchemaError), 5);
    }

    #[test]
    fn test_exit_code_from_overall() {
        assert_eq!(ExitCode::from_overall(true), ExitCode::Success);
        assert_eq!(ExitCode::from_overall(false), ExitCode::ValidationError);
    }

    #[test]
    fn test_exit_code_from_error() {
        assert_eq!(
            ExitCode::from_error(&ValidationError::schema_not_found(
                "trend_fetcher",
                Direction::Input
            )),
            ExitCode::SchemaError
        );
        assert_eq!(
            ExitCode::from_error(&ValidationError::file_error("gone")),
            ExitCode::FileError
        );
        assert_eq!(
            ExitCode::from_error(&ValidationError::invalid_input("bad flag")),
            ExitCode::InvalidInput
        );
        assert_eq!(
            ExitCode::from_error(&ValidationError::UnknownSkill("x".into())),
            ExitCode::InternalError
        );
    }
}
