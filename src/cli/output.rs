//! Output formatting for the Skill Contract Validation Agent CLI
//!
//! Provides structured output in JSON, YAML, and human-readable table
//! formats, with PASS/FAIL coloring for check results and per-violation
//! detail for payload validation.

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::error::ValidationError;
use crate::runner::RunReport;
use crate::schema::Direction;
use crate::validator::ValidationResult;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format for configuration output
    Yaml,
}

/// Check battery output structure for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRunOutput {
    /// Overall run status
    pub overall_ok: bool,
    /// Number of checks that passed
    pub passed_count: usize,
    /// Total number of checks
    pub total_count: usize,
    /// Per-check results
    pub checks: Vec<CheckOutput>,
    /// Summary message
    pub summary: String,
    /// Run duration in milliseconds
    pub duration_ms: u64,
}

/// Individual check output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutput {
    pub name: String,
    pub passed: bool,
    pub messages: Vec<String>,
}

impl CheckRunOutput {
    /// Create output from a run report
    pub fn from_report(report: &RunReport) -> Self {
        let passed_count = report.passed_count();
        let total_count = report.checks.len();

        let summary = if report.overall_ok {
            "All specification checks passed successfully!".to_string()
        } else {
            format!(
                "One or more specification checks failed ({}/{} passed)",
                passed_count, total_count
            )
        };

        Self {
            overall_ok: report.overall_ok,
            passed_count,
            total_count,
            checks: report
                .checks
                .iter()
                .map(|c| CheckOutput {
                    name: c.name.clone(),
                    passed: c.passed,
                    messages: c.messages.clone(),
                })
                .collect(),
            summary,
            duration_ms: report.duration_ms,
        }
    }

    /// Render output in the specified format
    pub fn render(&self, format: OutputFormat) -> Result<(), ValidationError> {
        match format {
            OutputFormat::Json => render_json(self),
            OutputFormat::Yaml => render_yaml(self),
            OutputFormat::Table => self.render_table(),
        }
    }

    /// Render as human-readable table
    fn render_table(&self) -> Result<(), ValidationError> {
        let mut stdout = io::stdout();

        writeln!(stdout).ok();
        writeln!(stdout, "{}", "Specification Check Results".cyan().bold()).ok();
        writeln!(stdout, "{}", "=".repeat(60)).ok();
        writeln!(stdout).ok();

        for check in &self.checks {
            let status = if check.passed {
                "[PASS]".green().bold()
            } else {
                "[FAIL]".red().bold()
            };
            writeln!(stdout, "{} {}", status, check.name).ok();
            for message in &check.messages {
                let line = if message.starts_with("ERROR:") {
                    message.red().to_string()
                } else {
                    message.dimmed().to_string()
                };
                writeln!(stdout, "    {}", line).ok();
            }
        }

        writeln!(stdout).ok();
        writeln!(stdout, "{}", "-".repeat(60)).ok();
        let summary = if self.overall_ok {
            self.summary.green().to_string()
        } else {
            self.summary.red().to_string()
        };
        writeln!(stdout, "{}", summary).ok();

        Ok(())
    }
}

/// Payload validation output structure for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadOutput {
    pub skill: String,
    pub direction: Direction,
    /// Overall validation status
    pub valid: bool,
    pub violation_count: usize,
    pub violations: Vec<ViolationOutput>,
    pub summary: String,
}

/// Individual violation output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationOutput {
    pub kind: String,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl PayloadOutput {
    /// Create output from a validation result
    pub fn from_result(skill: &str, direction: Direction, result: &ValidationResult) -> Self {
        let summary = if result.ok {
            format!("Payload satisfies the {} {} contract", skill, direction)
        } else {
            format!(
                "Payload violates the {} {} contract: {} violation(s)",
                skill,
                direction,
                result.violations.len()
            )
        };

        Self {
            skill: skill.to_string(),
            direction,
            valid: result.ok,
            violation_count: result.violations.len(),
            violations: result
                .violations
                .iter()
                .map(|v| ViolationOutput {
                    kind: v.kind.to_string(),
                    path: v.path.clone(),
                    message: v.message.clone(),
                    expected: v.expected.clone(),
                    actual: v.actual.clone(),
                })
                .collect(),
            summary,
        }
    }

    /// Render output in the specified format
    pub fn render(&self, format: OutputFormat) -> Result<(), ValidationError> {
        match format {
            OutputFormat::Json => render_json(self),
            OutputFormat::Yaml => render_yaml(self),
            OutputFormat::Table => self.render_table(),
        }
    }

    /// Render as human-readable table
    fn render_table(&self) -> Result<(), ValidationError> {
        let mut stdout = io::stdout();

        writeln!(stdout).ok();
        writeln!(stdout, "{}", "Contract Validation Results".cyan().bold()).ok();
        writeln!(stdout, "{}", "=".repeat(60)).ok();
        writeln!(stdout).ok();

        let status = if self.valid {
            "+".green()
        } else {
            "x".red()
        };
        writeln!(stdout, "{} {}", status, self.summary).ok();

        if !self.violations.is_empty() {
            writeln!(stdout).ok();
            writeln!(stdout, "{}", "Violations:".cyan().bold()).ok();
            writeln!(stdout, "{}", "-".repeat(60)).ok();

            for (index, violation) in self.violations.iter().enumerate() {
                writeln!(
                    stdout,
                    "{}. {} {} {}",
                    index + 1,
                    "x".red(),
                    violation.kind.yellow(),
                    violation.path.bold()
                )
                .ok();
                writeln!(stdout, "   {}", violation.message).ok();
                if let Some(expected) = &violation.expected {
                    writeln!(stdout, "   {} {}", "Expected:".dimmed(), expected).ok();
                }
                if let Some(actual) = &violation.actual {
                    writeln!(stdout, "   {} {}", "Actual:  ".dimmed(), actual).ok();
                }
            }
        }

        Ok(())
    }
}

fn render_json<T: Serialize>(value: &T) -> Result<(), ValidationError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ValidationError::SerializationError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn render_yaml<T: Serialize>(value: &T) -> Result<(), ValidationError> {
    let yaml = serde_yaml::to_string(value)
        .map_err(|e| ValidationError::SerializationError(e.to_string()))?;
    println!("{}", yaml);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CheckReport;
    use crate::validator::{Violation, ViolationKind};
    use chrono::Utc;

    fn sample_report(ok: bool) -> RunReport {
        RunReport {
            overall_ok: ok,
            checks: vec![
                CheckReport {
                    name: "Specification files".to_string(),
                    passed: true,
                    messages: vec!["OK: specs/_meta.md exists".to_string()],
                },
                CheckReport {
                    name: "Skill schemas".to_string(),
                    passed: ok,
                    messages: if ok {
                        vec![]
                    } else {
                        vec!["ERROR: trend_fetcher input schema is missing".to_string()]
                    },
                },
            ],
            completed_at: Utc::now(),
            duration_ms: 3,
        }
    }

    #[test]
    fn test_check_run_output_summary() {
        let output = CheckRunOutput::from_report(&sample_report(true));
        assert!(output.overall_ok);
        assert_eq!(output.passed_count, 2);
        assert!(output.summary.contains("passed successfully"));

        let output = CheckRunOutput::from_report(&sample_report(false));
        assert!(!output.overall_ok);
        assert!(output.summary.contains("1/2 passed"));
    }

    #[test]
    fn test_check_run_output_serializes() {
        let output = CheckRunOutput::from_report(&sample_report(false));
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"overall_ok\":false"));
        assert!(json.contains("Skill schemas"));
    }

    #[test]
    fn test_payload_output_counts_violations() {
        let result = ValidationResult::from_violations(vec![Violation::new(
            ViolationKind::RangeViolation,
            "parameters.timeframe_hours",
            "value 200 is above the maximum 168",
        )]);
        let output = PayloadOutput::from_result("trend_fetcher", Direction::Input, &result);
        assert!(!output.valid);
        assert_eq!(output.violation_count, 1);
        assert_eq!(output.violations[0].kind, "range_violation");
        assert!(output.summary.contains("1 violation(s)"));
    }
}
