//! Skill Contract Validation Agent CLI
//!
//! Command-line interface for the Skill Contract Validation Agent.
//!
//! # Usage
//!
//! ```bash
//! # Run the specification check battery against the current tree
//! skill-validate check
//!
//! # Validate a payload against a skill's input schema
//! skill-validate validate --payload request.json --skill trend_fetcher --direction input
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success - all checks/validations passed
//! - 1: One or more checks or contract validations failed
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 5: Schema-related errors
//! - 10: Internal error

use clap::Parser;
use skill_validation::{run_cli, ValidateCli};

fn main() {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    // Parse CLI arguments
    let cli = ValidateCli::parse();

    // Run the CLI and exit with appropriate code
    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
