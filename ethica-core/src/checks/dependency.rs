//! Dependency-declaration check: required libraries (explainability, fairness, ...).

use serde::Deserialize;
use std::path::Path;

use super::manifest::declared_dependencies;
use super::{Check, CheckBase, parse_config};
use crate::error::CheckConfigError;
use crate::model::{CheckResult, CheckSpec, CheckStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct DependencyConfig {
    /// Package names to look for.
    #[serde(default)]
    pub packages: Vec<String>,
    /// At least one package must be declared.
    #[serde(default = "default_true")]
    pub require_any: bool,
    /// Every package must be declared. Takes precedence over `require_any`.
    #[serde(default)]
    pub require_all: bool,
}

fn default_true() -> bool {
    true
}

/// Passes when the project declares the configured packages as dependencies.
pub struct DependencyCheck {
    base: CheckBase,
    config: DependencyConfig,
}

impl DependencyCheck {
    pub const TYPE: &'static str = "dependency-check";

    pub fn new(spec: &CheckSpec) -> Result<Self, CheckConfigError> {
        Ok(Self {
            base: CheckBase::from_spec(spec),
            config: parse_config(spec)?,
        })
    }

    pub(crate) fn build(spec: &CheckSpec) -> Result<Box<dyn Check>, CheckConfigError> {
        Ok(Box::new(Self::new(spec)?))
    }
}

impl Check for DependencyCheck {
    fn base(&self) -> &CheckBase {
        &self.base
    }

    fn run(&self, project_path: &Path) -> CheckResult {
        let packages = &self.config.packages;
        if packages.is_empty() {
            return self
                .base
                .result(CheckStatus::Skipped, "No packages configured for check", None);
        }

        let declared = declared_dependencies(project_path);
        let (found, missing): (Vec<&str>, Vec<&str>) = packages
            .iter()
            .map(String::as_str)
            .partition(|pkg| declared.contains(&pkg.to_lowercase()));

        if self.config.require_all {
            return if missing.is_empty() {
                self.base.result(
                    CheckStatus::Passed,
                    format!("All required packages found: {}", found.join(", ")),
                    None,
                )
            } else {
                let missing = missing.join(", ");
                self.base.result(
                    CheckStatus::Failed,
                    format!("Missing required packages: {missing}"),
                    Some(self.base.with_help(format!("Install: {missing}"))),
                )
            };
        }

        if !found.is_empty() {
            self.base.result(
                CheckStatus::Passed,
                format!("Found package(s): {}", found.join(", ")),
                None,
            )
        } else {
            let expected = packages.join(", ");
            self.base.result(
                CheckStatus::Failed,
                format!("No required packages found. Expected at least one of: {expected}"),
                Some(self.base.with_help(format!("Install one of: {expected}"))),
            )
        }
    }
}
