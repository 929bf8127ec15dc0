//! Typed schema tree for skill contracts
//!
//! Schema documents are stored as JSON-Schema-like files, one per
//! (skill, direction). They are parsed exactly once into the strongly
//! typed tree in this module; any document that does not fit the shape
//! is rejected as `SchemaMalformed` at load time, so the validator never
//! has to reason about ill-formed rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, ValidationError};

/// Which side of a skill contract a schema governs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// Get the direction name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
        }
    }

    /// Catalog file name for this direction
    pub fn schema_file_name(&self) -> &'static str {
        match self {
            Direction::Input => "input_schema.json",
            Direction::Output => "output_schema.json",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "input" | "in" => Ok(Direction::Input),
            "output" | "out" => Ok(Direction::Output),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

/// Expected value types for schema fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl ExpectedType {
    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedType::String => "string",
            ExpectedType::Integer => "integer",
            ExpectedType::Number => "number",
            ExpectedType::Boolean => "boolean",
            ExpectedType::Array => "array",
            ExpectedType::Object => "object",
        }
    }

    /// Parse a JSON-Schema `type` keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(ExpectedType::String),
            "integer" => Some(ExpectedType::Integer),
            "number" => Some(ExpectedType::Number),
            "boolean" => Some(ExpectedType::Boolean),
            "array" => Some(ExpectedType::Array),
            "object" => Some(ExpectedType::Object),
            _ => None,
        }
    }

    /// Check whether a concrete value has this type
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            ExpectedType::String => value.is_string(),
            ExpectedType::Integer => value.is_i64() || value.is_u64(),
            ExpectedType::Number => value.is_number(),
            ExpectedType::Boolean => value.is_boolean(),
            ExpectedType::Array => value.is_array(),
            ExpectedType::Object => value.is_object(),
        }
    }
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Get the JSON type name of a concrete value
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Validation rule for a single schema field
///
/// Each field carries exactly one rule variant; composite documents
/// (e.g. `type: integer` with `minimum`/`maximum`) collapse into the
/// most specific variant during parsing.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Value must equal the constant exactly (type and value)
    Const(serde_json::Value),
    /// Value must be one of the allowed values
    Enum(Vec<serde_json::Value>),
    /// Numeric value within a closed interval; each bound independent
    Range {
        min: Option<f64>,
        max: Option<f64>,
        /// Declared `type: integer` - fractional values are a type mismatch
        integer: bool,
    },
    /// String value matching an anchored regular expression
    Pattern(regex::Regex),
    /// Sequence whose every element satisfies the nested rule
    Array(Box<FieldRule>),
    /// Nested object validated against its own schema
    Object(Schema),
    /// Plain type check with no further constraints
    Typed(ExpectedType),
    /// No constraints
    Any,
}

impl FieldRule {
    /// Human-readable descriptor for the "expected" side of a violation
    pub fn describe(&self) -> String {
        match self {
            FieldRule::Const(v) => format!("constant {}", v),
            FieldRule::Enum(values) => {
                let listed: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("one of [{}]", listed.join(", "))
            }
            FieldRule::Range { min, max, integer } => {
                let kind = if *integer { "integer" } else { "number" };
                match (min, max) {
                    (Some(lo), Some(hi)) => format!("{} in [{}, {}]", kind, lo, hi),
                    (Some(lo), None) => format!("{} >= {}", kind, lo),
                    (None, Some(hi)) => format!("{} <= {}", kind, hi),
                    (None, None) => kind.to_string(),
                }
            }
            FieldRule::Pattern(re) => format!("string matching '{}'", re.as_str()),
            FieldRule::Array(_) => "array".to_string(),
            FieldRule::Object(_) => "object".to_string(),
            FieldRule::Typed(t) => t.as_str().to_string(),
            FieldRule::Any => "any".to_string(),
        }
    }
}

/// Structural description of a JSON-like value
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Field names that must be present
    pub required: Vec<String>,
    /// Per-field validation rules
    pub properties: BTreeMap<String, FieldRule>,
    /// Closed schemas reject fields absent from `properties`
    pub closed: bool,
}

impl Schema {
    /// Parse a schema document into the typed tree
    ///
    /// `origin` identifies the document in error reports (typically the
    /// catalog file path). Every malformed shape maps to a single
    /// well-defined `SchemaMalformed` error.
    pub fn parse(doc: &serde_json::Value, origin: &str) -> Result<Self> {
        parse_object_schema(doc, "")
            .map_err(|reason| ValidationError::schema_malformed(origin, reason))
    }
}

fn locate(location: &str, detail: &str) -> String {
    if location.is_empty() {
        detail.to_string()
    } else {
        format!("{}: {}", location, detail)
    }
}

fn parse_object_schema(
    doc: &serde_json::Value,
    location: &str,
) -> std::result::Result<Schema, String> {
    let map = doc
        .as_object()
        .ok_or_else(|| locate(location, "schema document must be an object"))?;

    if let Some(declared) = map.get("type") {
        match declared.as_str() {
            Some("object") => {}
            Some(other) => {
                return Err(locate(
                    location,
                    &format!("expected type 'object', found '{}'", other),
                ))
            }
            None => return Err(locate(location, "'type' must be a string")),
        }
    }

    let mut required = Vec::new();
    if let Some(req) = map.get("required") {
        let entries = req
            .as_array()
            .ok_or_else(|| locate(location, "'required' must be an array"))?;
        for entry in entries {
            let name = entry
                .as_str()
                .ok_or_else(|| locate(location, "'required' entries must be strings"))?;
            required.push(name.to_string());
        }
    }

    let mut properties = BTreeMap::new();
    if let Some(props) = map.get("properties") {
        let entries = props
            .as_object()
            .ok_or_else(|| locate(location, "'properties' must be an object"))?;
        for (name, spec) in entries {
            let child_location = if location.is_empty() {
                format!("properties.{}", name)
            } else {
                format!("{}.properties.{}", location, name)
            };
            properties.insert(name.clone(), parse_field_rule(spec, &child_location)?);
        }
    }

    let closed = match map.get("additionalProperties") {
        None => false,
        Some(serde_json::Value::Bool(allowed)) => !allowed,
        Some(_) => {
            return Err(locate(location, "'additionalProperties' must be a boolean"));
        }
    };

    Ok(Schema {
        required,
        properties,
        closed,
    })
}

fn parse_field_rule(
    spec: &serde_json::Value,
    location: &str,
) -> std::result::Result<FieldRule, String> {
    let map = spec
        .as_object()
        .ok_or_else(|| locate(location, "field rule must be an object"))?;

    if let Some(constant) = map.get("const") {
        return Ok(FieldRule::Const(constant.clone()));
    }

    if let Some(values) = map.get("enum") {
        let allowed = values
            .as_array()
            .ok_or_else(|| locate(location, "'enum' must be an array"))?;
        if allowed.is_empty() {
            return Err(locate(location, "'enum' must not be empty"));
        }
        return Ok(FieldRule::Enum(allowed.clone()));
    }

    if let Some(pattern) = map.get("pattern") {
        let source = pattern
            .as_str()
            .ok_or_else(|| locate(location, "'pattern' must be a string"))?;
        let compiled = regex::Regex::new(source)
            .map_err(|e| locate(location, &format!("invalid pattern: {}", e)))?;
        return Ok(FieldRule::Pattern(compiled));
    }

    let min = parse_bound(map.get("minimum"), location, "minimum")?;
    let max = parse_bound(map.get("maximum"), location, "maximum")?;
    if min.is_some() || max.is_some() {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(locate(
                    location,
                    &format!("range bounds inverted: minimum {} > maximum {}", lo, hi),
                ));
            }
        }
        let integer = map.get("type").and_then(|t| t.as_str()) == Some("integer");
        return Ok(FieldRule::Range { min, max, integer });
    }

    match map.get("type").and_then(|t| t.as_str()) {
        Some("object") => Ok(FieldRule::Object(parse_object_schema(spec, location)?)),
        Some("array") => {
            let items = match map.get("items") {
                Some(item_spec) => {
                    let child_location = format!("{}.items", location);
                    Box::new(parse_field_rule(item_spec, &child_location)?)
                }
                None => Box::new(FieldRule::Any),
            };
            Ok(FieldRule::Array(items))
        }
        Some(keyword) => {
            let expected = ExpectedType::from_keyword(keyword)
                .ok_or_else(|| locate(location, &format!("unknown type '{}'", keyword)))?;
            Ok(FieldRule::Typed(expected))
        }
        None => Ok(FieldRule::Any),
    }
}

fn parse_bound(
    value: Option<&serde_json::Value>,
    location: &str,
    keyword: &str,
) -> std::result::Result<Option<f64>, String> {
    match value {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| locate(location, &format!("'{}' must be a number", keyword))),
    }
}

/// The primary top-level output key each skill must declare
///
/// The binding is per skill: an output schema only passes the structural
/// check when it pairs its own primary key with a `metadata` object.
pub fn primary_output_key(skill: &str) -> Option<&'static str> {
    match skill {
        "trend_fetcher" => Some("trends"),
        "content_generator" => Some("content"),
        "engagement_manager" => Some("interaction"),
        _ => None,
    }
}

/// Structural invariants every input schema must satisfy
///
/// Returns human-readable problem descriptions; empty means the schema
/// is a well-formed input contract for the named skill.
pub fn check_input_invariants(schema: &Schema, skill: &str) -> Vec<String> {
    let mut problems = Vec::new();

    for field in ["skill_name", "parameters"] {
        if !schema.required.iter().any(|r| r == field) {
            problems.push(format!("'{}' must be a required field", field));
        }
    }

    match schema.properties.get("skill_name") {
        Some(FieldRule::Const(value)) => {
            if value.as_str() != Some(skill) {
                problems.push(format!(
                    "'skill_name' const must equal '{}', found {}",
                    skill, value
                ));
            }
        }
        Some(_) => problems.push("'skill_name' must be a const rule".to_string()),
        None => problems.push("missing 'skill_name' property".to_string()),
    }

    match schema.properties.get("parameters") {
        Some(FieldRule::Object(_)) => {}
        Some(_) => problems.push("'parameters' must be an object".to_string()),
        None => problems.push("missing 'parameters' property".to_string()),
    }

    problems
}

/// Structural invariants every output schema must satisfy
pub fn check_output_invariants(schema: &Schema, skill: &str) -> Vec<String> {
    let mut problems = Vec::new();

    let Some(key) = primary_output_key(skill) else {
        return vec![format!("no primary output key registered for skill '{}'", skill)];
    };

    if !schema.properties.contains_key(key) {
        problems.push(format!("missing primary output key '{}'", key));
    }
    if !schema.required.iter().any(|r| r == key) {
        problems.push(format!("primary output key '{}' must be required", key));
    }

    match schema.properties.get("metadata") {
        Some(FieldRule::Object(_)) => {
            if !schema.required.iter().any(|r| r == "metadata") {
                problems.push("'metadata' must be a required field".to_string());
            }
        }
        Some(_) => problems.push("'metadata' must be an object".to_string()),
        None => problems.push("missing 'metadata' property".to_string()),
    }

    problems
}

/// The bound pair of input and output schemas for one skill
///
/// Immutable once assembled for the duration of a validation run.
#[derive(Debug, Clone)]
pub struct SkillContract {
    pub skill: String,
    pub input: Arc<Schema>,
    pub output: Arc<Schema>,
}

impl SkillContract {
    /// Bind a contract to a skill name
    pub fn new(skill: impl Into<String>, input: Arc<Schema>, output: Arc<Schema>) -> Self {
        Self {
            skill: skill.into(),
            input,
            output,
        }
    }

    /// Get the schema for one direction
    pub fn schema(&self, direction: Direction) -> &Schema {
        match direction {
            Direction::Input => &self.input,
            Direction::Output => &self.output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direction_round_trip() {
        assert_eq!(Direction::Input.as_str(), "input");
        assert_eq!("output".parse::<Direction>().unwrap(), Direction::Output);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_parse_basic_input_schema() {
        let doc = json!({
            "type": "object",
            "required": ["skill_name", "parameters"],
            "properties": {
                "skill_name": { "const": "trend_fetcher" },
                "parameters": {
                    "type": "object",
                    "required": ["region"],
                    "properties": {
                        "region": { "type": "string" },
                        "timeframe_hours": { "type": "integer", "minimum": 1, "maximum": 168 }
                    }
                }
            }
        });

        let schema = Schema::parse(&doc, "test").unwrap();
        assert_eq!(schema.required, vec!["skill_name", "parameters"]);
        assert!(matches!(
            schema.properties.get("skill_name"),
            Some(FieldRule::Const(_))
        ));

        let FieldRule::Object(params) = schema.properties.get("parameters").unwrap() else {
            panic!("parameters must parse as a nested object");
        };
        assert!(matches!(
            params.properties.get("timeframe_hours"),
            Some(FieldRule::Range {
                min: Some(lo),
                max: Some(hi),
                integer: true
            }) if *lo == 1.0 && *hi == 168.0
        ));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = Schema::parse(&json!([1, 2, 3]), "skills/bad.json").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::SchemaMalformed { ref path, .. } if path == "skills/bad.json"
        ));
    }

    #[test]
    fn test_parse_rejects_bad_required() {
        let doc = json!({ "required": [1, 2] });
        let err = Schema::parse(&doc, "test").unwrap_err();
        assert!(err.to_string().contains("'required' entries must be strings"));
    }

    #[test]
    fn test_parse_rejects_empty_enum() {
        let doc = json!({ "properties": { "tier": { "enum": [] } } });
        let err = Schema::parse(&doc, "test").unwrap_err();
        assert!(err.to_string().contains("'enum' must not be empty"));
    }

    #[test]
    fn test_parse_rejects_inverted_range() {
        let doc = json!({ "properties": { "n": { "minimum": 10, "maximum": 1 } } });
        let err = Schema::parse(&doc, "test").unwrap_err();
        assert!(err.to_string().contains("range bounds inverted"));
    }

    #[test]
    fn test_parse_rejects_invalid_pattern() {
        let doc = json!({ "properties": { "uri": { "pattern": "^(unclosed" } } });
        let err = Schema::parse(&doc, "test").unwrap_err();
        assert!(err.to_string().contains("invalid pattern"));
    }

    #[test]
    fn test_closed_schema_flag() {
        let doc = json!({ "additionalProperties": false });
        let schema = Schema::parse(&doc, "test").unwrap();
        assert!(schema.closed);

        let doc = json!({ "additionalProperties": true });
        assert!(!Schema::parse(&doc, "test").unwrap().closed);
    }

    #[test]
    fn test_primary_output_key_binding() {
        assert_eq!(primary_output_key("trend_fetcher"), Some("trends"));
        assert_eq!(primary_output_key("content_generator"), Some("content"));
        assert_eq!(primary_output_key("engagement_manager"), Some("interaction"));
        assert_eq!(primary_output_key("unknown"), None);
    }

    #[test]
    fn test_input_invariants() {
        let doc = json!({
            "required": ["skill_name", "parameters"],
            "properties": {
                "skill_name": { "const": "trend_fetcher" },
                "parameters": { "type": "object" }
            }
        });
        let schema = Schema::parse(&doc, "test").unwrap();
        assert!(check_input_invariants(&schema, "trend_fetcher").is_empty());

        // Const bound to another skill's name is a structural problem
        let problems = check_input_invariants(&schema, "content_generator");
        assert!(problems.iter().any(|p| p.contains("skill_name")));
    }

    #[test]
    fn test_output_invariants_use_own_primary_key() {
        let doc = json!({
            "required": ["content", "metadata"],
            "properties": {
                "content": { "type": "object" },
                "metadata": { "type": "object" }
            }
        });
        let schema = Schema::parse(&doc, "test").unwrap();

        assert!(check_output_invariants(&schema, "content_generator").is_empty());

        // A trend_fetcher output declaring only 'content' must NOT pass
        let problems = check_output_invariants(&schema, "trend_fetcher");
        assert!(problems.iter().any(|p| p.contains("'trends'")));
    }
}
