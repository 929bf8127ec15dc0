//! Skill registry with contract-gated invocation
//!
//! Handlers are opaque capabilities injected at registration time. Every
//! `invoke` validates the request against the skill's input schema before
//! the handler runs and the response against its output schema after, so
//! no payload crosses a skill boundary unchecked.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{Result, ValidationError};
use crate::schema::{Direction, SkillContract};
use crate::validator::validate;

/// Error type skill handlers may fail with
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A skill's business logic, opaque to the validation layer
pub trait SkillHandler {
    fn handle(&self, payload: &serde_json::Value) -> std::result::Result<serde_json::Value, HandlerError>;
}

impl<F> SkillHandler for F
where
    F: Fn(&serde_json::Value) -> std::result::Result<serde_json::Value, HandlerError>,
{
    fn handle(&self, payload: &serde_json::Value) -> std::result::Result<serde_json::Value, HandlerError> {
        self(payload)
    }
}

struct RegisteredSkill {
    contract: SkillContract,
    handler: Box<dyn SkillHandler>,
}

/// Registry of skills and their bound contracts
#[derive(Default)]
pub struct SkillRegistry {
    skills: HashMap<String, RegisteredSkill>,
}

impl SkillRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a skill under its contract's name
    ///
    /// Re-registering a name replaces the previous entry.
    pub fn register(&mut self, contract: SkillContract, handler: Box<dyn SkillHandler>) {
        debug!(skill = %contract.skill, "registered skill");
        self.skills
            .insert(contract.skill.clone(), RegisteredSkill { contract, handler });
    }

    /// Names of all registered skills, sorted
    pub fn skill_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.skills.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Check whether a skill is registered
    pub fn contains(&self, skill: &str) -> bool {
        self.skills.contains_key(skill)
    }

    /// Invoke a skill with both contract gates applied
    ///
    /// Order: resolve, input gate, handler, output gate. An input
    /// violation means the handler is never called. An output violation
    /// surfaces after the handler ran; any side effects it had stand.
    pub fn invoke(&self, skill: &str, payload: &serde_json::Value) -> Result<serde_json::Value> {
        let entry = self
            .skills
            .get(skill)
            .ok_or_else(|| ValidationError::UnknownSkill(skill.to_string()))?;

        let input_result = validate(&entry.contract.input, payload);
        if !input_result.ok {
            warn!(
                skill,
                violations = input_result.violations.len(),
                "input contract violation"
            );
            return Err(ValidationError::ContractViolation {
                skill: skill.to_string(),
                direction: Direction::Input,
                violations: input_result.violations,
            });
        }

        let output = entry
            .handler
            .handle(payload)
            .map_err(|source| ValidationError::SkillExecution { source })?;

        let output_result = validate(&entry.contract.output, &output);
        if !output_result.ok {
            warn!(
                skill,
                violations = output_result.violations.len(),
                "output contract violation"
            );
            return Err(ValidationError::ContractViolation {
                skill: skill.to_string(),
                direction: Direction::Output,
                violations: output_result.violations,
            });
        }

        debug!(skill, "invocation passed both contract gates");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;

    fn contract(skill: &str, input: serde_json::Value, output: serde_json::Value) -> SkillContract {
        SkillContract::new(
            skill,
            Arc::new(Schema::parse(&input, "test-input").unwrap()),
            Arc::new(Schema::parse(&output, "test-output").unwrap()),
        )
    }

    fn trend_contract() -> SkillContract {
        contract(
            "trend_fetcher",
            json!({
                "required": ["skill_name", "parameters"],
                "properties": {
                    "skill_name": { "const": "trend_fetcher" },
                    "parameters": { "type": "object" }
                }
            }),
            json!({
                "required": ["trends", "metadata"],
                "properties": {
                    "trends": { "type": "array" },
                    "metadata": { "type": "object" }
                }
            }),
        )
    }

    struct CountingHandler {
        calls: Rc<Cell<usize>>,
        response: serde_json::Value,
    }

    impl SkillHandler for CountingHandler {
        fn handle(
            &self,
            _payload: &serde_json::Value,
        ) -> std::result::Result<serde_json::Value, HandlerError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.response.clone())
        }
    }

    #[test]
    fn test_unknown_skill() {
        let registry = SkillRegistry::new();
        let err = registry.invoke("mystery", &json!({})).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownSkill(ref name) if name == "mystery"));
    }

    #[test]
    fn test_input_violation_skips_handler() {
        let calls = Rc::new(Cell::new(0));
        let mut registry = SkillRegistry::new();
        registry.register(
            trend_contract(),
            Box::new(CountingHandler {
                calls: Rc::clone(&calls),
                response: json!({ "trends": [], "metadata": {} }),
            }),
        );

        let err = registry
            .invoke("trend_fetcher", &json!({ "skill_name": "wrong" }))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ContractViolation { direction: Direction::Input, .. }
        ));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_output_violation_after_handler_ran() {
        let calls = Rc::new(Cell::new(0));
        let mut registry = SkillRegistry::new();
        registry.register(
            trend_contract(),
            Box::new(CountingHandler {
                calls: Rc::clone(&calls),
                response: json!({ "trends": "not-an-array" }),
            }),
        );

        let err = registry
            .invoke(
                "trend_fetcher",
                &json!({ "skill_name": "trend_fetcher", "parameters": {} }),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ContractViolation { direction: Direction::Output, .. }
        ));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_handler_error_wrapped_unchanged() {
        let mut registry = SkillRegistry::new();
        registry.register(
            trend_contract(),
            Box::new(
                |_payload: &serde_json::Value| -> std::result::Result<serde_json::Value, HandlerError> {
                    Err("upstream feed unavailable".into())
                },
            ),
        );

        let err = registry
            .invoke(
                "trend_fetcher",
                &json!({ "skill_name": "trend_fetcher", "parameters": {} }),
            )
            .unwrap_err();
        let ValidationError::SkillExecution { source } = err else {
            panic!("handler failure must wrap as SkillExecution");
        };
        assert_eq!(source.to_string(), "upstream feed unavailable");
    }

    #[test]
    fn test_passing_invocation_returns_output() {
        let mut registry = SkillRegistry::new();
        registry.register(
            trend_contract(),
            Box::new(
                |_payload: &serde_json::Value| -> std::result::Result<serde_json::Value, HandlerError> {
                    Ok(json!({ "trends": [], "metadata": { "source_count": 0 } }))
                },
            ),
        );

        let output = registry
            .invoke(
                "trend_fetcher",
                &json!({ "skill_name": "trend_fetcher", "parameters": {} }),
            )
            .unwrap();
        assert_eq!(output["metadata"]["source_count"], 0);
    }
}
