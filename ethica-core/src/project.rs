//! Project configuration (`.ai-ethics.yaml`) and project initialization.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::EthicaError;
use crate::registry::FrameworkRegistry;
use crate::report::ReportFormat;
use crate::templates;

pub const PROJECT_CONFIG_FILE: &str = ".ai-ethics.yaml";
pub const CONFIG_VERSION: &str = "1.0";

/// Per-project compliance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub frameworks: Vec<FrameworkSelection>,
    /// Check ids never run for this project.
    #[serde(default)]
    pub exclude_checks: Vec<String>,
    /// Reserved for project-defined checks. Carried through but not run.
    #[serde(default)]
    pub custom_checks: Vec<serde_yaml::Value>,
    #[serde(default)]
    pub metadata: ProjectMetadata,
    #[serde(default)]
    pub reporting: ReportingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkSelection {
    pub id: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_level")]
    pub compliance_level: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectMetadata {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub last_assessed: Option<String>,
    #[serde(default)]
    pub assessment_tool_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportingConfig {
    #[serde(default = "default_formats")]
    pub formats: Vec<ReportFormat>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            formats: default_formats(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "standard".to_string()
}

fn default_formats() -> Vec<ReportFormat> {
    vec![ReportFormat::Text]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./ethics-reports")
}

impl ProjectConfig {
    /// The document written by `ethica init`.
    pub fn new(framework: &str, level: &str, project_name: &str) -> Self {
        Self {
            version: default_version(),
            frameworks: vec![FrameworkSelection {
                id: framework.to_string(),
                enabled: true,
                compliance_level: level.to_string(),
            }],
            exclude_checks: Vec::new(),
            custom_checks: Vec::new(),
            metadata: ProjectMetadata {
                project_name: project_name.to_string(),
                last_assessed: None,
                assessment_tool_version: env!("CARGO_PKG_VERSION").to_string(),
            },
            reporting: ReportingConfig::default(),
        }
    }

    /// Path of the configuration file inside a project directory.
    pub fn path_in(project_dir: &Path) -> PathBuf {
        project_dir.join(PROJECT_CONFIG_FILE)
    }

    /// Load the configuration of a project.
    pub fn load(project_dir: &Path) -> Result<Self, EthicaError> {
        let path = Self::path_in(project_dir);
        if !path.exists() {
            return Err(EthicaError::ConfigMissing { path });
        }
        let content = std::fs::read_to_string(&path)?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| EthicaError::InvalidDocument {
                path: path.clone(),
                message: e.to_string(),
            })?;
        debug!(path = %path.display(), frameworks = config.frameworks.len(), "Loaded project config");
        Ok(config)
    }

    /// Write the configuration into a project directory.
    pub fn save(&self, project_dir: &Path) -> Result<PathBuf, EthicaError> {
        let path = Self::path_in(project_dir);
        std::fs::write(&path, serde_yaml::to_string(self)?)?;
        Ok(path)
    }

    /// The first enabled framework.
    pub fn selected_framework(&self) -> Option<&FrameworkSelection> {
        self.frameworks.iter().find(|f| f.enabled)
    }
}

/// Files written by [`init_project`].
#[derive(Debug, Clone, PartialEq)]
pub struct InitOutcome {
    pub config_path: PathBuf,
    /// Templates created. Existing files are never overwritten.
    pub created_templates: Vec<PathBuf>,
}

/// Initialize compliance configuration in `project_dir`.
///
/// Fails with [`EthicaError::NotFound`] for a framework the registry does not
/// know and with [`EthicaError::ConfigExists`] when a configuration is already
/// present and `force` is not set.
pub fn init_project(
    project_dir: &Path,
    registry: &FrameworkRegistry,
    framework: &str,
    level: &str,
    force: bool,
) -> Result<InitOutcome, EthicaError> {
    if registry.get(framework).is_none() {
        return Err(EthicaError::NotFound {
            id: framework.to_string(),
            available: registry.ids(),
        });
    }

    let config_path = ProjectConfig::path_in(project_dir);
    if config_path.exists() && !force {
        return Err(EthicaError::ConfigExists { path: config_path });
    }

    let config = ProjectConfig::new(framework, level, &project_name(project_dir));
    let config_path = config.save(project_dir)?;
    info!(path = %config_path.display(), framework, level, "Wrote project config");

    std::fs::create_dir_all(project_dir.join("docs"))?;

    let mut created_templates = Vec::new();
    for template in templates::for_framework(framework) {
        let path = project_dir.join(template.path);
        if path.exists() {
            debug!(path = %path.display(), "Template target exists, leaving it alone");
            continue;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, template.content)?;
        created_templates.push(path);
    }

    Ok(InitOutcome {
        config_path,
        created_templates,
    })
}

fn project_name(project_dir: &Path) -> String {
    let dir = project_dir
        .canonicalize()
        .unwrap_or_else(|_| project_dir.to_path_buf());
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FrameworkMetadata;
    use pretty_assertions::assert_eq;

    fn registry() -> FrameworkRegistry {
        let entry = |id: &str| FrameworkMetadata {
            id: id.into(),
            name: id.to_uppercase(),
            version: None,
            category: "international".into(),
            status: None,
        };
        FrameworkRegistry::from_entries("/nonexistent", vec![entry("unesco-2021"), entry("oecd-2019")])
            .unwrap()
    }

    #[test]
    fn test_new_config_document() {
        let config = ProjectConfig::new("unesco-2021", "basic", "demo");
        let yaml = serde_yaml::to_string(&config).unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(doc["version"], "1.0");
        assert_eq!(doc["frameworks"][0]["id"], "unesco-2021");
        assert_eq!(doc["frameworks"][0]["enabled"], true);
        assert_eq!(doc["frameworks"][0]["compliance_level"], "basic");
        assert_eq!(doc["metadata"]["project_name"], "demo");
        assert!(doc["metadata"]["last_assessed"].is_null());
        assert_eq!(doc["reporting"]["formats"][0], "text");
        assert_eq!(doc["reporting"]["output_dir"], "./ethics-reports");

        let keys: Vec<&str> = doc
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(|k| k.as_str())
            .collect();
        assert_eq!(
            keys,
            vec!["version", "frameworks", "exclude_checks", "custom_checks", "metadata", "reporting"]
        );
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, EthicaError::ConfigMissing { .. }));
    }

    #[test]
    fn test_load_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "frameworks:\n  - id: oecd-2019\n    enabled: false\n  - id: unesco-2021\nexclude_checks: [unesco-005]\n",
        )
        .unwrap();

        let config = ProjectConfig::load(dir.path()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.selected_framework().unwrap().id, "unesco-2021");
        assert_eq!(config.selected_framework().unwrap().compliance_level, "standard");
        assert_eq!(config.exclude_checks, vec!["unesco-005".to_string()]);
        assert_eq!(config.reporting, ReportingConfig::default());
    }

    #[test]
    fn test_no_enabled_framework() {
        let mut config = ProjectConfig::new("unesco-2021", "standard", "demo");
        config.frameworks[0].enabled = false;
        assert!(config.selected_framework().is_none());
    }

    #[test]
    fn test_invalid_config_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "frameworks: 12\n").unwrap();
        let err = ProjectConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, EthicaError::InvalidDocument { .. }));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ProjectConfig::new("unesco-2021", "verified", "demo");
        config.reporting.formats = vec![ReportFormat::Json, ReportFormat::Markdown];
        config.save(dir.path()).unwrap();
        assert_eq!(ProjectConfig::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_init_writes_config_and_templates() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = init_project(dir.path(), &registry(), "unesco-2021", "standard", false).unwrap();

        assert_eq!(outcome.config_path, dir.path().join(PROJECT_CONFIG_FILE));
        assert_eq!(
            outcome.created_templates,
            vec![
                dir.path().join("docs/MODEL_CARD.md"),
                dir.path().join("docs/PRIVACY_IMPACT_ASSESSMENT.md"),
            ]
        );
        let config = ProjectConfig::load(dir.path()).unwrap();
        assert_eq!(config.frameworks[0].id, "unesco-2021");
        assert_eq!(
            config.metadata.project_name,
            dir.path().canonicalize().unwrap().file_name().unwrap().to_string_lossy()
        );
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        init_project(dir.path(), &registry(), "unesco-2021", "standard", false).unwrap();
        let err = init_project(dir.path(), &registry(), "unesco-2021", "basic", false).unwrap_err();
        assert!(matches!(err, EthicaError::ConfigExists { .. }));

        init_project(dir.path(), &registry(), "oecd-2019", "basic", true).unwrap();
        let config = ProjectConfig::load(dir.path()).unwrap();
        assert_eq!(config.frameworks[0].id, "oecd-2019");
    }

    #[test]
    fn test_init_keeps_existing_templates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/MODEL_CARD.md"), "# Ours").unwrap();

        let outcome = init_project(dir.path(), &registry(), "unesco-2021", "standard", false).unwrap();
        assert_eq!(outcome.created_templates.len(), 1);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("docs/MODEL_CARD.md")).unwrap(),
            "# Ours"
        );
    }

    #[test]
    fn test_init_without_templates_still_creates_docs() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = init_project(dir.path(), &registry(), "oecd-2019", "basic", false).unwrap();
        assert!(outcome.created_templates.is_empty());
        assert!(dir.path().join("docs").is_dir());
    }

    #[test]
    fn test_init_unknown_framework() {
        let dir = tempfile::tempdir().unwrap();
        let err = init_project(dir.path(), &registry(), "ieee-7000", "basic", false).unwrap_err();
        assert!(matches!(err, EthicaError::NotFound { .. }));
        assert!(!dir.path().join(PROJECT_CONFIG_FILE).exists());
    }
}
