//! Check interface: trait, shared base, and type-tag registry.
//!
//! Checks only read the project directory. Expected conditions such as a
//! missing file or an undeclared dependency are encoded in the returned
//! [`CheckResult`], never as errors.

pub mod dependency;
pub mod file;
pub mod manifest;

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;

use crate::error::CheckConfigError;
use crate::model::{CheckResult, CheckSpec, CheckStatus, Severity};

pub use dependency::DependencyCheck;
pub use file::FileExistsCheck;

/// A single automated test for one piece of compliance evidence.
pub trait Check: Send + Sync {
    /// Static definition this check was built from.
    fn base(&self) -> &CheckBase;

    /// Evaluate the check against a project directory.
    fn run(&self, project_path: &Path) -> CheckResult;

    fn id(&self) -> &str {
        &self.base().id
    }

    fn principle(&self) -> &str {
        &self.base().principle
    }
}

/// Fields every check carries over from its [`CheckSpec`].
#[derive(Debug, Clone)]
pub struct CheckBase {
    pub id: String,
    pub name: String,
    pub principle: String,
    pub severity: Severity,
    pub description: String,
    pub help_url: Option<String>,
}

impl CheckBase {
    pub fn from_spec(spec: &CheckSpec) -> Self {
        Self {
            id: spec.id.clone(),
            name: spec.name.clone(),
            principle: spec.principle.clone(),
            severity: spec.severity,
            description: spec.description.clone(),
            help_url: spec.help_url.clone(),
        }
    }

    /// Build a result stamped with this check's id, name, and severity.
    pub fn result(
        &self,
        status: CheckStatus,
        message: impl Into<String>,
        suggestion: Option<String>,
    ) -> CheckResult {
        CheckResult {
            check_id: self.id.clone(),
            name: self.name.clone(),
            status,
            message: message.into(),
            severity: self.severity,
            suggestion,
        }
    }

    /// Append the help URL, if any, to a suggestion.
    pub fn with_help(&self, suggestion: String) -> String {
        match &self.help_url {
            Some(url) => format!("{suggestion}\nSee: {url}"),
            None => suggestion,
        }
    }
}

/// Deserialize a check's `config` map into its typed variant config.
pub fn parse_config<T: DeserializeOwned>(spec: &CheckSpec) -> Result<T, CheckConfigError> {
    serde_yaml::from_value(serde_yaml::Value::Mapping(spec.config.clone())).map_err(|e| {
        CheckConfigError::Invalid {
            check_id: spec.id.clone(),
            message: e.to_string(),
        }
    })
}

/// Constructor registered for a check type tag.
pub type CheckConstructor = fn(&CheckSpec) -> Result<Box<dyn Check>, CheckConfigError>;

/// Maps check type tags to constructors.
pub struct CheckRegistry {
    constructors: HashMap<String, CheckConstructor>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Create with the built-in check variants.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(FileExistsCheck::TYPE, FileExistsCheck::build);
        registry.register(DependencyCheck::TYPE, DependencyCheck::build);
        registry
    }

    /// Register a constructor, replacing any previous one for the same tag.
    pub fn register(&mut self, check_type: impl Into<String>, constructor: CheckConstructor) {
        self.constructors.insert(check_type.into(), constructor);
    }

    pub fn is_known(&self, check_type: &str) -> bool {
        self.constructors.contains_key(check_type)
    }

    /// Registered type tags, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Instantiate the check described by `spec`.
    pub fn build(&self, spec: &CheckSpec) -> Result<Box<dyn Check>, CheckConfigError> {
        let constructor = self
            .constructors
            .get(&spec.check_type)
            .ok_or_else(|| CheckConfigError::UnknownType(spec.check_type.clone()))?;
        constructor(spec)
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Stand-in for a known check type whose config could not be read.
///
/// Always fails so a broken framework document cannot look compliant.
pub(crate) struct MisconfiguredCheck {
    base: CheckBase,
    reason: String,
}

impl MisconfiguredCheck {
    pub(crate) fn new(spec: &CheckSpec, error: &CheckConfigError) -> Self {
        Self {
            base: CheckBase::from_spec(spec),
            reason: error.to_string(),
        }
    }
}

impl Check for MisconfiguredCheck {
    fn base(&self) -> &CheckBase {
        &self.base
    }

    fn run(&self, _project_path: &Path) -> CheckResult {
        self.base.result(
            CheckStatus::Failed,
            format!("Check could not be configured: {}", self.reason),
            Some("Fix the check configuration in the framework specification".into()),
        )
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::model::{CheckSpec, Severity};

    /// Build a check spec from an inline YAML config map.
    pub fn spec(check_type: &str, severity: Severity, config_yaml: &str) -> CheckSpec {
        let config = if config_yaml.trim().is_empty() {
            serde_yaml::Mapping::new()
        } else {
            serde_yaml::from_str(config_yaml).unwrap()
        };
        CheckSpec {
            id: "test-001".into(),
            name: "Test Check".into(),
            principle: "test".into(),
            check_type: check_type.into(),
            severity,
            description: "Test check".into(),
            config,
            help_url: None,
        }
    }
}
