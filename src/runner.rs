//! Validation run orchestrator
//!
//! Executes an ordered battery of named checks with full-report
//! semantics: every check runs no matter what failed before it, and the
//! report carries each check's message lines. The standard battery is
//! the framework self-check: spec documents present, skill schemas load
//! and hold their structural invariants, and the test and meta artifacts
//! cite the specification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use tracing::info;

use crate::schema::{check_input_invariants, check_output_invariants, Direction};
use crate::store::SchemaStore;
use crate::trace::{check_references, ReferenceRule};

/// The skills whose contracts the standard battery verifies
pub const SKILLS: [&str; 3] = ["trend_fetcher", "content_generator", "engagement_manager"];

/// Specification documents that must exist
pub const SPEC_FILES: [&str; 4] = [
    "specs/_meta.md",
    "specs/functional.md",
    "specs/technical.md",
    "specs/openclaw_integration.md",
];

/// Test artifacts that must cite the specification
pub const TEST_FILES: [&str; 1] = ["tests/integration.rs"];

/// Shared context handed to every check
pub struct RunContext {
    /// Root of the tree under validation
    pub root: PathBuf,
}

impl RunContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Accumulated outcome of a single check
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    passed: bool,
    messages: Vec<String>,
}

impl CheckOutcome {
    /// Start a passing outcome; any `fail` flips it
    pub fn new() -> Self {
        Self {
            passed: true,
            messages: Vec::new(),
        }
    }

    /// Record a passing observation
    pub fn pass(&mut self, msg: impl Into<String>) {
        self.messages.push(format!("OK: {}", msg.into()));
    }

    /// Record a failing observation
    pub fn fail(&mut self, msg: impl Into<String>) {
        self.passed = false;
        self.messages.push(format!("ERROR: {}", msg.into()));
    }

    pub fn passed(&self) -> bool {
        self.passed
    }
}

type CheckFn = Box<dyn Fn(&RunContext) -> CheckOutcome>;

/// Report for one named check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub name: String,
    pub passed: bool,
    pub messages: Vec<String>,
}

/// Report for a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub overall_ok: bool,
    pub checks: Vec<CheckReport>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }
}

/// Ordered battery of named checks
#[derive(Default)]
pub struct Runner {
    checks: Vec<(String, CheckFn)>,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named check; order of registration is order of execution
    pub fn with_check(
        mut self,
        name: impl Into<String>,
        check: impl Fn(&RunContext) -> CheckOutcome + 'static,
    ) -> Self {
        self.checks.push((name.into(), Box::new(check)));
        self
    }

    /// Run every check and aggregate the report
    pub fn run(&self, ctx: &RunContext) -> RunReport {
        let started = std::time::Instant::now();
        let mut checks = Vec::with_capacity(self.checks.len());

        for (name, check) in &self.checks {
            info!(check = %name, "running check");
            let outcome = check(ctx);
            checks.push(CheckReport {
                name: name.clone(),
                passed: outcome.passed,
                messages: outcome.messages,
            });
        }

        RunReport {
            overall_ok: checks.iter().all(|c| c.passed),
            checks,
            completed_at: Utc::now(),
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// Build the standard four-check battery
pub fn standard_runner() -> Runner {
    Runner::new()
        .with_check("Specification files", check_spec_files)
        .with_check("Skill schemas", check_skill_schemas)
        .with_check("Test spec references", check_test_references)
        .with_check("Spec meta references", check_meta_references)
}

fn check_spec_files(ctx: &RunContext) -> CheckOutcome {
    let mut outcome = CheckOutcome::new();
    for file in SPEC_FILES {
        if ctx.root.join(file).is_file() {
            outcome.pass(format!("{} exists", file));
        } else {
            outcome.fail(format!("{} is missing", file));
        }
    }
    outcome
}

fn check_skill_schemas(ctx: &RunContext) -> CheckOutcome {
    let mut outcome = CheckOutcome::new();
    let store = SchemaStore::new(ctx.root.join("skills"));

    for skill in SKILLS {
        for direction in [Direction::Input, Direction::Output] {
            match store.load(skill, direction) {
                Ok(schema) => {
                    let problems = match direction {
                        Direction::Input => check_input_invariants(&schema, skill),
                        Direction::Output => check_output_invariants(&schema, skill),
                    };
                    if problems.is_empty() {
                        outcome.pass(format!("{} {} schema is well-formed", skill, direction));
                    } else {
                        for problem in problems {
                            outcome.fail(format!("{} {} schema: {}", skill, direction, problem));
                        }
                    }
                }
                Err(crate::error::ValidationError::SchemaNotFound { .. }) => {
                    outcome.fail(format!("{} {} schema is missing", skill, direction));
                }
                Err(e) => {
                    outcome.fail(format!("{} {} schema: {}", skill, direction, e));
                }
            }
        }
    }
    outcome
}

fn check_test_references(ctx: &RunContext) -> CheckOutcome {
    let rules: Vec<ReferenceRule> = TEST_FILES
        .iter()
        .map(|file| {
            ReferenceRule::cites(file, &["SRS Section", "technical.md", "functional.md"])
        })
        .collect();
    report_to_outcome(check_references(&ctx.root, &rules))
}

fn check_meta_references(ctx: &RunContext) -> CheckOutcome {
    let rules = vec![
        ReferenceRule::cites("specs/_meta.md", &["SRS"]),
        ReferenceRule::cites("specs/_meta.md", &["Task 1 Report"]),
    ];
    report_to_outcome(check_references(&ctx.root, &rules))
}

fn report_to_outcome(report: crate::trace::TraceReport) -> CheckOutcome {
    let mut outcome = CheckOutcome::new();
    for rule in report.outcomes {
        if rule.passed {
            outcome.pass(rule.detail);
        } else {
            outcome.fail(rule.detail);
        }
    }
    outcome
}
