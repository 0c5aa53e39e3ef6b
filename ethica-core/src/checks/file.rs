//! File-existence check: required documentation and configuration files.

use serde::Deserialize;
use std::path::Path;

use super::{Check, CheckBase, parse_config};
use crate::error::CheckConfigError;
use crate::model::{CheckResult, CheckSpec, CheckStatus};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileExistsConfig {
    /// Candidate paths relative to the project root; any one satisfies the check.
    #[serde(default)]
    pub paths: Vec<String>,
}

/// Passes when at least one of the configured paths exists.
pub struct FileExistsCheck {
    base: CheckBase,
    config: FileExistsConfig,
}

impl FileExistsCheck {
    pub const TYPE: &'static str = "file-exists";

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

impl Check for FileExistsCheck {
    fn base(&self) -> &CheckBase {
        &self.base
    }

    fn run(&self, project_path: &Path) -> CheckResult {
        let paths = &self.config.paths;
        if paths.is_empty() {
            return self
                .base
                .result(CheckStatus::Skipped, "No paths configured for check", None);
        }

        // Files and directories both count.
        if let Some(found) = paths.iter().find(|p| project_path.join(p).exists()) {
            return self.base.result(
                CheckStatus::Passed,
                format!("Found required file/directory at {found}"),
                None,
            );
        }

        let expected = paths.join(", ");
        self.base.result(
            CheckStatus::Failed,
            format!("Required file/directory not found. Expected one of: {expected}"),
            Some(self.base.with_help(format!("Create one of: {expected}"))),
        )
    }
}
