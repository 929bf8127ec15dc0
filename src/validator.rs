//! Contract validation engine
//!
//! Walks a payload against a typed [`Schema`](crate::schema::Schema) and
//! accumulates every discrepancy as a [`Violation`]. Validation never
//! fails as an error: a malformed payload is an ordinary result with
//! `ok == false`. The walk is depth-first and does not short-circuit,
//! so one pass reports everything wrong with a payload.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::{json_type_name, FieldRule, Schema};

/// Categories of contract violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingField,
    ConstMismatch,
    EnumMismatch,
    RangeViolation,
    PatternMismatch,
    TypeMismatch,
    UnexpectedField,
}

impl ViolationKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MissingField => "missing_field",
            ViolationKind::ConstMismatch => "const_mismatch",
            ViolationKind::EnumMismatch => "enum_mismatch",
            ViolationKind::RangeViolation => "range_violation",
            ViolationKind::PatternMismatch => "pattern_mismatch",
            ViolationKind::TypeMismatch => "type_mismatch",
            ViolationKind::UnexpectedField => "unexpected_field",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single contract violation at a specific payload location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Dotted path into the payload, e.g. `parameters.timeframe_hours`
    /// or `trends[2].sources[0]`
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl Violation {
    /// Create a new violation
    pub fn new(kind: ViolationKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Attach the expected value/shape description
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Attach the actual value description
    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.path, self.message)
    }
}

/// Outcome of validating one payload against one schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    /// Build a result from an accumulated violation list
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            ok: violations.is_empty(),
            violations,
        }
    }

    /// A passing result with no violations
    pub fn passed() -> Self {
        Self {
            ok: true,
            violations: Vec::new(),
        }
    }
}

/// Validate a payload against a schema
///
/// The payload must be a JSON object at the top level; anything else is
/// a single root-level `TypeMismatch`.
pub fn validate(schema: &Schema, payload: &serde_json::Value) -> ValidationResult {
    let mut violations = Vec::new();
    match payload.as_object() {
        Some(_) => check_object(schema, payload, "", &mut violations),
        None => violations.push(
            Violation::new(
                ViolationKind::TypeMismatch,
                "$",
                format!("payload must be an object, found {}", json_type_name(payload)),
            )
            .with_expected("object")
            .with_actual(json_type_name(payload)),
        ),
    }
    ValidationResult::from_violations(violations)
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// Short single-line rendering of a payload value for violation reports
fn summarize(value: &serde_json::Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() > 60 {
        let truncated: String = rendered.chars().take(57).collect();
        format!("{}...", truncated)
    } else {
        rendered
    }
}

fn check_object(
    schema: &Schema,
    payload: &serde_json::Value,
    prefix: &str,
    violations: &mut Vec<Violation>,
) {
    let map = match payload.as_object() {
        Some(m) => m,
        None => {
            violations.push(
                Violation::new(
                    ViolationKind::TypeMismatch,
                    if prefix.is_empty() { "$" } else { prefix },
                    format!("expected object, found {}", json_type_name(payload)),
                )
                .with_expected("object")
                .with_actual(json_type_name(payload)),
            );
            return;
        }
    };

    for field in &schema.required {
        if !map.contains_key(field) {
            let path = join_path(prefix, field);
            violations.push(
                Violation::new(
                    ViolationKind::MissingField,
                    path,
                    format!("required field '{}' is missing", field),
                )
                .with_expected("present"),
            );
        }
    }

    for (field, rule) in &schema.properties {
        if let Some(value) = map.get(field) {
            check_rule(rule, value, &join_path(prefix, field), violations);
        }
    }

    if schema.closed {
        for field in map.keys() {
            if !schema.properties.contains_key(field) {
                let path = join_path(prefix, field);
                violations.push(
                    Violation::new(
                        ViolationKind::UnexpectedField,
                        path,
                        format!("field '{}' is not allowed by a closed schema", field),
                    )
                    .with_actual("present"),
                );
            }
        }
    }
}

fn check_rule(
    rule: &FieldRule,
    value: &serde_json::Value,
    path: &str,
    violations: &mut Vec<Violation>,
) {
    match rule {
        FieldRule::Any => {}

        FieldRule::Const(expected) => {
            // Exact equality: 1 and 1.0 are different constants
            if value != expected {
                violations.push(
                    Violation::new(
                        ViolationKind::ConstMismatch,
                        path,
                        format!("value must equal {}", expected),
                    )
                    .with_expected(summarize(expected))
                    .with_actual(summarize(value)),
                );
            }
        }

        FieldRule::Enum(allowed) => {
            if !allowed.contains(value) {
                violations.push(
                    Violation::new(
                        ViolationKind::EnumMismatch,
                        path,
                        "value is not one of the allowed values",
                    )
                    .with_expected(rule.describe())
                    .with_actual(summarize(value)),
                );
            }
        }

        FieldRule::Range { min, max, integer } => {
            let number = if *integer {
                if value.is_i64() || value.is_u64() {
                    value.as_f64()
                } else {
                    None
                }
            } else {
                value.as_f64()
            };

            let Some(n) = number else {
                push_type_mismatch(
                    path,
                    if *integer { "integer" } else { "number" },
                    value,
                    violations,
                );
                return;
            };

            // Each violated bound reports independently
            if let Some(lo) = min {
                if n < *lo {
                    violations.push(
                        Violation::new(
                            ViolationKind::RangeViolation,
                            path,
                            format!("value {} is below the minimum {}", n, lo),
                        )
                        .with_expected(format!(">= {}", lo))
                        .with_actual(n.to_string()),
                    );
                }
            }
            if let Some(hi) = max {
                if n > *hi {
                    violations.push(
                        Violation::new(
                            ViolationKind::RangeViolation,
                            path,
                            format!("value {} is above the maximum {}", n, hi),
                        )
                        .with_expected(format!("<= {}", hi))
                        .with_actual(n.to_string()),
                    );
                }
            }
        }

        FieldRule::Pattern(re) => {
            let Some(s) = value.as_str() else {
                push_type_mismatch(path, "string", value, violations);
                return;
            };
            if !re.is_match(s) {
                violations.push(
                    Violation::new(
                        ViolationKind::PatternMismatch,
                        path,
                        format!("value does not match pattern '{}'", re.as_str()),
                    )
                    .with_expected(rule.describe())
                    .with_actual(summarize(value)),
                );
            }
        }

        FieldRule::Array(item_rule) => {
            let Some(items) = value.as_array() else {
                push_type_mismatch(path, "array", value, violations);
                return;
            };
            for (index, item) in items.iter().enumerate() {
                let item_path = format!("{}[{}]", path, index);
                check_rule(item_rule, item, &item_path, violations);
            }
        }

        FieldRule::Object(nested) => {
            check_object(nested, value, path, violations);
        }

        FieldRule::Typed(expected) => {
            if !expected.matches(value) {
                push_type_mismatch(path, expected.as_str(), value, violations);
            }
        }
    }
}

fn push_type_mismatch(
    path: &str,
    expected: &str,
    value: &serde_json::Value,
    violations: &mut Vec<Violation>,
) {
    violations.push(
        Violation::new(
            ViolationKind::TypeMismatch,
            path,
            format!("expected {}, found {}", expected, json_type_name(value)),
        )
        .with_expected(expected.to_string())
        .with_actual(json_type_name(value).to_string()),
    );
}
