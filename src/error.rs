//! Error types for the Skill Contract Validation Agent
//!
//! Provides structured error types for schema loading, skill invocation,
//! and I/O operations. Payload-shape problems are NOT errors: the
//! validator reports them as [`crate::validator::Violation`] data.

use thiserror::Error;

use crate::schema::Direction;
use crate::validator::Violation;

/// Main error type for validation operations
#[derive(Error, Debug)]
pub enum ValidationError {
    /// No catalog entry exists for the requested schema
    #[error("Schema not found for skill '{skill}' ({direction})")]
    SchemaNotFound { skill: String, direction: Direction },

    /// The catalog entry exists but cannot be parsed into a schema
    #[error("Malformed schema '{path}': {reason}")]
    SchemaMalformed { path: String, reason: String },

    /// Invocation of a skill that was never registered
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    /// A payload crossed a skill boundary without satisfying its contract
    #[error("Contract violation on {direction} of skill '{skill}': {} violation(s)", .violations.len())]
    ContractViolation {
        skill: String,
        direction: Direction,
        violations: Vec<Violation>,
    },

    /// Opaque failure from a skill handler, propagated unchanged
    #[error("Skill execution failed: {source}")]
    SkillExecution {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Payload parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ValidationError {
    /// Create a schema-not-found error
    pub fn schema_not_found(skill: impl Into<String>, direction: Direction) -> Self {
        ValidationError::SchemaNotFound {
            skill: skill.into(),
            direction,
        }
    }

    /// Create a malformed-schema error
    pub fn schema_malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::SchemaMalformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ValidationError::InvalidInput(msg.into())
    }

    /// Create a file error
    pub fn file_error(msg: impl Into<String>) -> Self {
        ValidationError::FileError(msg.into())
    }

    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        ValidationError::ParseError(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ValidationError::InvalidInput(_)
                | ValidationError::FileError(_)
                | ValidationError::ParseError(_)
                | ValidationError::SchemaNotFound { .. }
                | ValidationError::SchemaMalformed { .. }
        )
    }
}

impl From<std::io::Error> for ValidationError {
    fn from(err: std::io::Error) -> Self {
        ValidationError::FileError(err.to_string())
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::ParseError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for ValidationError {
    fn from(err: serde_yaml::Error) -> Self {
        ValidationError::ParseError(format!("YAML error: {}", err))
    }
}

/// Result type alias for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::schema_not_found("trend_fetcher", Direction::Input);
        assert_eq!(
            err.to_string(),
            "Schema not found for skill 'trend_fetcher' (input)"
        );

        let err = ValidationError::UnknownSkill("mystery".to_string());
        assert_eq!(err.to_string(), "Unknown skill: mystery");
    }

    #[test]
    fn test_contract_violation_display_counts() {
        let err = ValidationError::ContractViolation {
            skill: "trend_fetcher".to_string(),
            direction: Direction::Output,
            violations: vec![],
        };
        assert!(err.to_string().contains("output"));
        assert!(err.to_string().contains("0 violation(s)"));
    }

    #[test]
    fn test_is_user_error() {
        assert!(ValidationError::invalid_input("test").is_user_error());
        assert!(ValidationError::schema_malformed("skills/x.json", "bad").is_user_error());
        assert!(!ValidationError::UnknownSkill("test".to_string()).is_user_error());
        assert!(!ValidationError::SkillExecution {
            source: "boom".into(),
        }
        .is_user_error());
    }
}
