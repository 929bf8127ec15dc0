//! Skill Contract Validation Agent
//!
//! A contract-validation and specification-traceability harness for a
//! small multi-skill agent framework (trend_fetcher, content_generator,
//! engagement_manager).
//!
//! ## Features
//!
//! - **Schema Store**: File-backed catalog of per-skill input/output
//!   schemas with lazy caching and distinct not-found/malformed failures
//! - **Contract Validator**: Depth-first payload validation that reports
//!   every violation in one pass (required fields, constants, enums,
//!   ranges, patterns, arrays, nested objects)
//! - **Skill Registry**: Contract-gated invocation - input schema checked
//!   before the handler runs, output schema checked after
//! - **Traceability**: Declarative rules linking spec documents, schemas,
//!   and test artifacts
//! - **Check Runner**: Ordered battery with full-report semantics and a
//!   standard four-check framework self-check
//! - **CLI Support**: `check` and `validate` subcommands with table,
//!   JSON, and YAML output
//!
//! ## CLI Usage
//!
//! ```bash
//! # Run the full specification check battery
//! skill-validate check --root .
//!
//! # Validate a payload against one skill schema
//! skill-validate validate --payload request.json --skill trend_fetcher --direction input
//! ```

pub mod cli;
pub mod error;
pub mod registry;
pub mod runner;
pub mod schema;
pub mod store;
pub mod trace;
pub mod validator;

// Re-export core types
pub use error::{Result, ValidationError};
pub use registry::{HandlerError, SkillHandler, SkillRegistry};
pub use runner::{CheckOutcome, CheckReport, RunContext, RunReport, Runner};
pub use schema::{Direction, ExpectedType, FieldRule, Schema, SkillContract};
pub use store::SchemaStore;
pub use trace::{check_references, ReferenceRule, RuleOutcome, TraceReport};
pub use validator::{validate, ValidationResult, Violation, ViolationKind};

// Re-export CLI types for command-line usage
pub use cli::{ExitCode, OutputFormat, ValidateCli, ValidateCommands};

/// Agent version (from Cargo.toml)
pub const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Agent identifier
pub const AGENT_ID: &str = "skill-validation-agent";

/// Run the CLI application
///
/// This is the main entry point for the CLI binary.
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use skill_validation::{run_cli, ValidateCli};
///
/// fn main() {
///     let cli = ValidateCli::parse();
///     let exit_code = run_cli(cli);
///     std::process::exit(exit_code.into());
/// }
/// ```
pub fn run_cli(cli: ValidateCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_user_error() {
                ExitCode::from_error(&e)
            } else {
                ExitCode::InternalError
            }
        }
    }
}
