//! Framework registry: catalog of available ethics frameworks.
//!
//! A catalog directory holds `registry.yaml`:
//!
//! ```yaml
//! frameworks:
//!   international:
//!     - id: unesco-2021
//!       name: UNESCO AI Ethics Recommendation 2021
//!       version: "2021"
//!       status: stable
//!   regional: null
//! ```
//!
//! Each framework's full specification is stored by convention at
//! `<frameworks_dir>/<id>/framework.yaml` and is read fresh on every request.
//! The frameworks shipped with Ethica are compiled into the library and used
//! when no catalog directory is configured.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::EthicaError;
use crate::model::{FrameworkMetadata, FrameworkSpec, optional_scalar_string};

pub const REGISTRY_FILE: &str = "registry.yaml";
pub const SPEC_FILE: &str = "framework.yaml";

/// Root the built-in catalog reports paths under.
pub const BUILTIN_ROOT: &str = "frameworks";

const BUILTIN_REGISTRY: &str = include_str!("../frameworks/registry.yaml");

const BUILTIN_SPECS: &[(&str, &str)] = &[(
    "unesco-2021",
    include_str!("../frameworks/unesco-2021/framework.yaml"),
)];

/// Bundled `framework.yaml` text of a built-in framework.
pub fn builtin_spec(id: &str) -> Option<&'static str> {
    BUILTIN_SPECS
        .iter()
        .find(|(builtin, _)| *builtin == id)
        .map(|(_, content)| *content)
}

#[derive(Debug, Deserialize)]
struct RegistryEntry {
    id: String,
    name: String,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    version: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    status: Option<String>,
}

/// Where a registry reads framework specifications from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Documents compiled into the library.
    Builtin,
    /// A catalog directory on disk.
    Dir(PathBuf),
}

/// Read-only catalog of frameworks, loaded once at startup.
#[derive(Debug, Clone)]
pub struct FrameworkRegistry {
    source: CatalogSource,
    frameworks: Vec<FrameworkMetadata>,
}

impl FrameworkRegistry {
    /// The catalog shipped with Ethica.
    pub fn builtin() -> Result<Self, EthicaError> {
        let frameworks = parse_registry(BUILTIN_REGISTRY).map_err(|e| match e {
            EthicaError::Yaml(e) => EthicaError::InvalidDocument {
                path: Path::new(BUILTIN_ROOT).join(REGISTRY_FILE),
                message: e.to_string(),
            },
            other => other,
        })?;
        debug!(frameworks = frameworks.len(), "Loaded built-in framework registry");
        Ok(Self {
            source: CatalogSource::Builtin,
            frameworks,
        })
    }

    /// Open the registry stored in `frameworks_dir`.
    ///
    /// A missing registry file yields an empty catalog.
    pub fn open(frameworks_dir: impl Into<PathBuf>) -> Result<Self, EthicaError> {
        let frameworks_dir = frameworks_dir.into();
        let registry_path = frameworks_dir.join(REGISTRY_FILE);

        if !registry_path.exists() {
            debug!(path = %registry_path.display(), "No registry file, using empty catalog");
            return Ok(Self {
                source: CatalogSource::Dir(frameworks_dir),
                frameworks: Vec::new(),
            });
        }

        let content = std::fs::read_to_string(&registry_path)?;
        let frameworks = parse_registry(&content).map_err(|e| match e {
            EthicaError::Yaml(e) => EthicaError::InvalidDocument {
                path: registry_path.clone(),
                message: e.to_string(),
            },
            other => other,
        })?;
        info!(
            path = %registry_path.display(),
            frameworks = frameworks.len(),
            "Loaded framework registry"
        );

        Ok(Self {
            source: CatalogSource::Dir(frameworks_dir),
            frameworks,
        })
    }

    /// Open `frameworks_dir` when given, otherwise the built-in catalog.
    pub fn open_or_builtin(frameworks_dir: Option<&Path>) -> Result<Self, EthicaError> {
        match frameworks_dir {
            Some(dir) => Self::open(dir),
            None => Self::builtin(),
        }
    }

    /// Build a registry from an in-memory catalog.
    pub fn from_entries(
        frameworks_dir: impl Into<PathBuf>,
        frameworks: Vec<FrameworkMetadata>,
    ) -> Result<Self, EthicaError> {
        ensure_unique(&frameworks)?;
        Ok(Self {
            source: CatalogSource::Dir(frameworks_dir.into()),
            frameworks,
        })
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Catalog root. Built-in catalogs report [`BUILTIN_ROOT`].
    pub fn frameworks_dir(&self) -> &Path {
        match &self.source {
            CatalogSource::Builtin => Path::new(BUILTIN_ROOT),
            CatalogSource::Dir(dir) => dir,
        }
    }

    /// All frameworks in registry-document order.
    pub fn list(&self) -> &[FrameworkMetadata] {
        &self.frameworks
    }

    /// Get framework metadata by id.
    pub fn get(&self, id: &str) -> Option<&FrameworkMetadata> {
        self.frameworks.iter().find(|f| f.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.frameworks.iter().map(|f| f.id.clone()).collect()
    }

    /// Directory of a framework's specification files.
    pub fn framework_dir(&self, id: &str) -> Result<PathBuf, EthicaError> {
        self.require(id)?;
        Ok(self.frameworks_dir().join(id))
    }

    /// Load the full specification of a framework.
    pub fn load_spec(&self, id: &str) -> Result<FrameworkSpec, EthicaError> {
        let spec_path = self.framework_dir(id)?.join(SPEC_FILE);

        let spec = match &self.source {
            CatalogSource::Builtin => {
                let content = builtin_spec(id).ok_or_else(|| EthicaError::SpecMissing {
                    id: id.to_string(),
                    path: spec_path.clone(),
                })?;
                FrameworkSpec::from_yaml_str(content).map_err(|e| EthicaError::InvalidDocument {
                    path: spec_path,
                    message: e.to_string(),
                })?
            }
            CatalogSource::Dir(_) => {
                if !spec_path.exists() {
                    return Err(EthicaError::SpecMissing {
                        id: id.to_string(),
                        path: spec_path,
                    });
                }
                FrameworkSpec::from_path(&spec_path)?
            }
        };

        debug!(
            framework = id,
            principles = spec.principles.len(),
            checks = spec.checks.len(),
            "Loaded framework specification"
        );
        Ok(spec)
    }

    fn require(&self, id: &str) -> Result<&FrameworkMetadata, EthicaError> {
        self.get(id).ok_or_else(|| EthicaError::NotFound {
            id: id.to_string(),
            available: self.ids(),
        })
    }
}

/// Flatten the category → list mapping, stamping each entry with its category.
fn parse_registry(content: &str) -> Result<Vec<FrameworkMetadata>, EthicaError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let doc: serde_yaml::Value = serde_yaml::from_str(content)?;
    let Some(categories) = doc.get("frameworks").and_then(|f| f.as_mapping()) else {
        return Ok(Vec::new());
    };

    let mut frameworks = Vec::new();
    for (category, entries) in categories {
        if entries.is_null() {
            continue;
        }
        let category = match category.as_str() {
            Some(s) => s.to_string(),
            None => serde_yaml::to_string(category)?.trim().to_string(),
        };
        let entries: Vec<RegistryEntry> = serde_yaml::from_value(entries.clone())?;
        frameworks.extend(entries.into_iter().map(|e| FrameworkMetadata {
            id: e.id,
            name: e.name,
            version: e.version,
            category: category.clone(),
            status: e.status,
        }));
    }

    ensure_unique(&frameworks)?;
    Ok(frameworks)
}

fn ensure_unique(frameworks: &[FrameworkMetadata]) -> Result<(), EthicaError> {
    let mut seen = HashSet::new();
    for fw in frameworks {
        if !seen.insert(fw.id.as_str()) {
            return Err(EthicaError::DuplicateFramework { id: fw.id.clone() });
        }
    }
    Ok(())
}
