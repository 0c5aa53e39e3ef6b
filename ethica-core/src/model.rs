//! Framework and check data model.
//!
//! A framework document is trusted input: it is deserialized as-is and only
//! the check type tag is left open so that unknown variants can be dropped
//! by the engine instead of failing the whole load.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::EthicaError;

/// A framework entry in the registry listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkMetadata {
    /// Framework identifier (e.g., "unesco-2021").
    pub id: String,
    /// Display name.
    pub name: String,
    #[serde(
        default,
        deserialize_with = "optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    /// Registry category the entry was listed under.
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl FrameworkMetadata {
    pub fn version_or_na(&self) -> &str {
        self.version.as_deref().unwrap_or("N/A")
    }

    pub fn status_or_default(&self) -> &str {
        self.status.as_deref().unwrap_or("available")
    }
}

/// Read a YAML scalar as text, so `version: 2021` and `version: "2021"` agree.
fn scalar_text(value: serde_yaml::Value) -> Result<Option<String>, String> {
    match value {
        serde_yaml::Value::Null => Ok(None),
        serde_yaml::Value::String(s) => Ok(Some(s)),
        serde_yaml::Value::Number(n) => Ok(Some(n.to_string())),
        serde_yaml::Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err("expected a string or number".to_string()),
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    scalar_text(serde_yaml::Value::deserialize(deserializer)?)
        .map_err(serde::de::Error::custom)?
        .ok_or_else(|| serde::de::Error::custom("expected a string or number, found null"))
}

pub(crate) fn optional_scalar_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    scalar_text(serde_yaml::Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

/// Full specification document for one framework.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkSpec {
    pub metadata: SpecMetadata,
    #[serde(default)]
    pub principles: Vec<Principle>,
    #[serde(default)]
    pub checks: Vec<CheckSpec>,
    /// Named bars of rigor. Descriptive only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_levels: Option<BTreeMap<String, ComplianceLevel>>,
}

impl FrameworkSpec {
    /// Parse a framework document from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Read and parse a framework document from disk.
    pub fn from_path(path: &Path) -> Result<Self, EthicaError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| EthicaError::InvalidDocument {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Look up a principle by id.
    pub fn principle(&self, id: &str) -> Option<&Principle> {
        self.principles.iter().find(|p| p.id == id)
    }

    /// Number of declared checks with the given severity.
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.checks.iter().filter(|c| c.severity == severity).count()
    }
}

/// Descriptive metadata block of a framework document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecMetadata {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// A named ethical dimension that checks are grouped under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principle {
    pub id: String,
    pub name: String,
    /// Relative importance. Not used in scoring.
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceLevel {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Declarative definition of one check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSpec {
    pub id: String,
    pub name: String,
    /// Id of the principle this check belongs to.
    pub principle: String,
    /// Variant tag ("file-exists", "dependency-check", ...).
    #[serde(rename = "type")]
    pub check_type: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    /// Variant-specific parameters.
    #[serde(default)]
    pub config: serde_yaml::Mapping,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
}

/// How serious a failed check is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks compliance.
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Outcome of one check, also used for principle-level status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Passed => write!(f, "passed"),
            CheckStatus::Failed => write!(f, "failed"),
            CheckStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Result of running one check against a project directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    #[serde(rename = "id")]
    pub check_id: String,
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub severity: Severity,
    pub suggestion: Option<String>,
}

impl CheckResult {
    /// Failed with `error` severity, i.e. blocks compliance.
    pub fn is_blocking(&self) -> bool {
        self.status == CheckStatus::Failed && self.severity == Severity::Error
    }
}
