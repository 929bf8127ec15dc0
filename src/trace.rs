//! Specification traceability checks
//!
//! Traceability rules are plain data: an artifact path plus the keywords
//! that count as a citation. A rule passes when the artifact exists and
//! at least one keyword appears in its text. Rules that demand several
//! independent citations are written as one single-keyword rule each, so
//! every missing citation reports on its own line.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One declarative traceability requirement
#[derive(Debug, Clone)]
pub struct ReferenceRule {
    /// Artifact path, relative to the run root
    pub artifact: PathBuf,
    /// Keywords of which at least one must appear; empty means the
    /// artifact only has to exist
    pub keywords: Vec<String>,
}

impl ReferenceRule {
    /// Require that an artifact exists
    pub fn exists(artifact: impl Into<PathBuf>) -> Self {
        Self {
            artifact: artifact.into(),
            keywords: Vec::new(),
        }
    }

    /// Require that an artifact cites at least one of the keywords
    pub fn cites(artifact: impl Into<PathBuf>, keywords: &[&str]) -> Self {
        Self {
            artifact: artifact.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Outcome of evaluating one rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub artifact: PathBuf,
    pub passed: bool,
    pub detail: String,
}

/// Outcome of a whole rule table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceReport {
    pub ok: bool,
    pub outcomes: Vec<RuleOutcome>,
}

/// Evaluate a rule table against a root directory
///
/// Every rule is evaluated; one failure never hides another. Keyword
/// matching is exact, case-sensitive substring search.
pub fn check_references(root: &Path, rules: &[ReferenceRule]) -> TraceReport {
    let outcomes: Vec<RuleOutcome> = rules.iter().map(|rule| check_rule(root, rule)).collect();
    TraceReport {
        ok: outcomes.iter().all(|o| o.passed),
        outcomes,
    }
}

fn check_rule(root: &Path, rule: &ReferenceRule) -> RuleOutcome {
    let path = root.join(&rule.artifact);
    if !path.is_file() {
        return RuleOutcome {
            artifact: rule.artifact.clone(),
            passed: false,
            detail: format!("{} not found", rule.artifact.display()),
        };
    }

    if rule.keywords.is_empty() {
        return RuleOutcome {
            artifact: rule.artifact.clone(),
            passed: true,
            detail: format!("{} exists", rule.artifact.display()),
        };
    }

    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) => {
            return RuleOutcome {
                artifact: rule.artifact.clone(),
                passed: false,
                detail: format!("cannot read {}: {}", rule.artifact.display(), e),
            }
        }
    };

    match rule.keywords.iter().find(|k| text.contains(k.as_str())) {
        Some(hit) => RuleOutcome {
            artifact: rule.artifact.clone(),
            passed: true,
            detail: format!("{} references '{}'", rule.artifact.display(), hit),
        },
        None => RuleOutcome {
            artifact: rule.artifact.clone(),
            passed: false,
            detail: format!(
                "{} has no reference to any of [{}]",
                rule.artifact.display(),
                rule.keywords.join(", ")
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_artifact_fails() {
        let tmp = TempDir::new().unwrap();
        let report = check_references(tmp.path(), &[ReferenceRule::exists("specs/_meta.md")]);
        assert!(!report.ok);
        assert!(report.outcomes[0].detail.contains("not found"));
    }

    #[test]
    fn test_keyword_or_semantics() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("notes.md"), "see functional.md for details").unwrap();

        let rule = ReferenceRule::cites("notes.md", &["technical.md", "functional.md"]);
        let report = check_references(tmp.path(), &[rule]);
        assert!(report.ok);
        assert!(report.outcomes[0].detail.contains("functional.md"));
    }

    #[test]
    fn test_rules_fail_independently() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("_meta.md"), "Derived from the SRS.").unwrap();

        let rules = vec![
            ReferenceRule::cites("_meta.md", &["SRS"]),
            ReferenceRule::cites("_meta.md", &["Task 1 Report"]),
        ];
        let report = check_references(tmp.path(), &rules);
        assert!(!report.ok);
        assert!(report.outcomes[0].passed);
        assert!(!report.outcomes[1].passed);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("doc.md"), "srs section 3").unwrap();

        let report =
            check_references(tmp.path(), &[ReferenceRule::cites("doc.md", &["SRS Section"])]);
        assert!(!report.ok);
    }

    #[test]
    fn test_empty_keywords_is_existence_check() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("present.md"), "").unwrap();

        let report = check_references(tmp.path(), &[ReferenceRule::exists("present.md")]);
        assert!(report.ok);
    }
}
