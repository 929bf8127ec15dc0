//! CLI command definitions for the Skill Contract Validation Agent
//!
//! Provides Clap-based command definitions for running the specification
//! check battery and for validating a single payload file against one
//! skill schema.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::output::{CheckRunOutput, OutputFormat, PayloadOutput};
use super::ExitCode;
use crate::error::ValidationError;
use crate::runner::{standard_runner, RunContext};
use crate::schema::Direction;
use crate::store::SchemaStore;
use crate::validator::validate;

/// Skill Contract Validation Agent CLI
///
/// Run the framework's specification check battery or validate individual
/// payloads against skill contracts.
#[derive(Parser, Debug)]
#[command(name = "skill-validate")]
#[command(about = "Skill Contract Validation Agent - contract and spec traceability checks", long_about = None)]
#[command(version)]
pub struct ValidateCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: ValidateCommands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum ValidateCommands {
    /// Run the full specification check battery
    ///
    /// Executes every check (spec documents, skill schemas, traceability)
    /// and prints one PASS/FAIL line per check plus a summary. Exits 0
    /// only when every check passed.
    Check {
        /// Root directory of the tree to check
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Output format for the run report
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },

    /// Validate a payload file against one skill schema
    ///
    /// Loads the schema for the given skill and direction from the
    /// catalog and reports every contract violation in the payload.
    Validate {
        /// Path to the payload file (JSON or YAML)
        #[arg(short, long)]
        payload: PathBuf,

        /// Skill whose contract to validate against
        #[arg(short, long)]
        skill: String,

        /// Contract direction: input or output
        #[arg(short, long, default_value = "input")]
        direction: String,

        /// Schema catalog root
        #[arg(short, long, default_value = "skills")]
        catalog: PathBuf,

        /// Output format for validation results
        #[arg(long, value_enum, default_value = "table")]
        format: Option<OutputFormat>,
    },
}

/// Execute the check command
pub fn execute_check(
    root: PathBuf,
    format: Option<OutputFormat>,
) -> Result<ExitCode, ValidationError> {
    let ctx = RunContext::new(root);
    let report = standard_runner().run(&ctx);

    let output = CheckRunOutput::from_report(&report);
    output.render(format.unwrap_or(OutputFormat::Table))?;

    Ok(ExitCode::from_overall(report.overall_ok))
}

/// Execute the validate command
pub fn execute_validate(
    payload: PathBuf,
    skill: String,
    direction: String,
    catalog: PathBuf,
    format: Option<OutputFormat>,
) -> Result<ExitCode, ValidationError> {
    let direction: Direction = direction
        .parse()
        .map_err(ValidationError::InvalidInput)?;

    let content = std::fs::read_to_string(&payload).map_err(|e| {
        ValidationError::FileError(format!(
            "Failed to read payload file '{}': {}",
            payload.display(),
            e
        ))
    })?;
    let value = parse_payload_file(&payload, &content)?;

    let store = SchemaStore::new(catalog);
    let schema = store.load(&skill, direction)?;
    let result = validate(&schema, &value);

    let output = PayloadOutput::from_result(&skill, direction, &result);
    output.render(format.unwrap_or(OutputFormat::Table))?;

    Ok(ExitCode::from_overall(result.ok))
}

/// Parse a payload file based on its extension
fn parse_payload_file(
    path: &PathBuf,
    content: &str,
) -> Result<serde_json::Value, ValidationError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => serde_json::from_str(content)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e))),
        "yaml" | "yml" => serde_yaml::from_str(content)
            .map_err(|e| ValidationError::ParseError(format!("Invalid YAML: {}", e))),
        _ => Err(ValidationError::InvalidInput(format!(
            "Unsupported file format: {}. Supported formats: json, yaml, yml",
            extension
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload_json() {
        let content = r#"{"skill_name": "trend_fetcher", "parameters": {}}"#;
        let path = PathBuf::from("payload.json");
        let value = parse_payload_file(&path, content).unwrap();
        assert_eq!(value["skill_name"], "trend_fetcher");
    }

    #[test]
    fn test_parse_payload_yaml() {
        let content = "skill_name: trend_fetcher\nparameters:\n  region: global";
        let path = PathBuf::from("payload.yaml");
        let value = parse_payload_file(&path, content).unwrap();
        assert_eq!(value["parameters"]["region"], "global");
    }

    #[test]
    fn test_parse_payload_unsupported() {
        let path = PathBuf::from("payload.txt");
        assert!(parse_payload_file(&path, "whatever").is_err());
    }

    #[test]
    fn test_direction_argument_parsing() {
        assert_eq!("input".parse::<Direction>().unwrap(), Direction::Input);
        assert_eq!("out".parse::<Direction>().unwrap(), Direction::Output);
        assert!("both".parse::<Direction>().is_err());
    }
}
