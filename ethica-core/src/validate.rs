//! Structural validation of framework specification documents.

use std::collections::HashSet;
use std::fmt;

use crate::checks::CheckRegistry;
use crate::model::FrameworkSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// The document is inconsistent; checks may be misreported.
    Error,
    /// The document loads but something will be ignored at run time.
    Warning,
}

impl fmt::Display for IssueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueLevel::Error => write!(f, "error"),
            IssueLevel::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub level: IssueLevel,
    pub message: String,
}

impl ValidationIssue {
    fn error(message: String) -> Self {
        Self {
            level: IssueLevel::Error,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            level: IssueLevel::Warning,
            message,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

/// Inspect a framework document for problems the engine would paper over.
///
/// Issues are returned in document order: principles first, then checks.
pub fn validate_spec(spec: &FrameworkSpec, registry: &CheckRegistry) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut principle_ids = HashSet::new();
    for principle in &spec.principles {
        if !principle_ids.insert(principle.id.as_str()) {
            issues.push(ValidationIssue::error(format!(
                "principle '{}' is declared more than once",
                principle.id
            )));
        }
    }

    let mut check_ids = HashSet::new();
    for check in &spec.checks {
        if !check_ids.insert(check.id.as_str()) {
            issues.push(ValidationIssue::error(format!(
                "check '{}' is declared more than once",
                check.id
            )));
        }
        if !principle_ids.contains(check.principle.as_str()) {
            issues.push(ValidationIssue::error(format!(
                "check '{}' references undeclared principle '{}'",
                check.id, check.principle
            )));
        }
        if !registry.is_known(&check.check_type) {
            issues.push(ValidationIssue::warning(format!(
                "check '{}' has unknown type '{}' and will be skipped",
                check.id, check.check_type
            )));
            continue;
        }
        if let Err(e) = registry.build(check) {
            issues.push(ValidationIssue::error(e.to_string()));
        }
    }

    issues
}

/// Whether any issue is an error.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.level == IssueLevel::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn validate(yaml: &str) -> Vec<ValidationIssue> {
        let spec = FrameworkSpec::from_yaml_str(yaml).unwrap();
        validate_spec(&spec, &CheckRegistry::with_defaults())
    }

    #[test]
    fn test_clean_document() {
        let issues = validate(
            r#"
metadata: {id: demo, name: Demo, version: "1"}
principles:
  - {id: privacy, name: Privacy, weight: 1.0}
checks:
  - id: p-1
    name: PIA
    principle: privacy
    type: file-exists
    severity: error
    config: {paths: [PIA.md]}
"#,
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_reports_each_problem() {
        let issues = validate(
            r#"
metadata: {id: demo, name: Demo, version: "1"}
principles:
  - {id: privacy, name: Privacy, weight: 1.0}
  - {id: privacy, name: Privacy again, weight: 1.0}
checks:
  - {id: c-1, name: A, principle: privacy, type: file-exists, severity: error}
  - {id: c-1, name: B, principle: safety, type: file-exists, severity: error}
  - {id: c-2, name: C, principle: privacy, type: llm-review, severity: info}
  - id: c-3
    name: D
    principle: privacy
    type: dependency-check
    severity: warning
    config: {packages: oops}
"#,
        );

        let messages: Vec<String> = issues.iter().map(ToString::to_string).collect();
        assert_eq!(messages.len(), 5);
        assert_eq!(
            &messages[..4],
            &[
                "error: principle 'privacy' is declared more than once",
                "error: check 'c-1' is declared more than once",
                "error: check 'c-1' references undeclared principle 'safety'",
                "warning: check 'c-2' has unknown type 'llm-review' and will be skipped",
            ]
        );
        assert!(messages[4].starts_with("error: invalid config for check 'c-3'"));
        assert!(has_errors(&issues));
    }

    #[test]
    fn test_unknown_type_alone_is_not_an_error() {
        let issues = validate(
            r#"
metadata: {id: demo, name: Demo, version: "1"}
principles: [{id: p, name: P, weight: 1.0}]
checks:
  - {id: c, name: C, principle: p, type: survey, severity: info}
"#,
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].level, IssueLevel::Warning);
        assert!(!has_errors(&issues));
    }
}
