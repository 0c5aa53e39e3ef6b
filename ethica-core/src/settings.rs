//! Tool settings, layered with figment.
//!
//! Precedence, lowest first: built-in defaults, the user file
//! `<config_dir>/ethica/config.toml`, the workspace file `.ethica/config.toml`,
//! `ETHICA_*` environment variables, then explicit overrides from the CLI.

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::EthicaError;
use crate::registry::FrameworkRegistry;
use crate::report::ReportFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the framework catalog. Unset means the built-in catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frameworks_dir: Option<PathBuf>,
    /// Framework used by `ethica init` when none is given.
    pub default_framework: String,
    /// Compliance level used by `ethica init` when none is given.
    pub default_level: String,
    /// Report format used by `ethica check` when none is given.
    pub output: ReportFormat,
    /// Colorize terminal output.
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frameworks_dir: None,
            default_framework: "unesco-2021".to_string(),
            default_level: "standard".to_string(),
            output: ReportFormat::Text,
            color: true,
        }
    }
}

impl Settings {
    /// Open the configured catalog directory, or the built-in catalog when unset.
    pub fn open_registry(&self) -> Result<FrameworkRegistry, EthicaError> {
        FrameworkRegistry::open_or_builtin(self.frameworks_dir.as_deref())
    }
}

/// Values given explicitly on the command line. `None` leaves a layer alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frameworks_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Platform directories for Ethica (config file, log files).
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "ethica", "ethica")
}

/// Load settings from all layers.
pub fn load_settings(
    workspace: Option<&Path>,
    overrides: Option<&SettingsOverrides>,
) -> Result<Settings, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));

    if let Some(dirs) = project_dirs() {
        let user_config = dirs.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(".ethica").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    figment = figment.merge(Env::prefixed("ETHICA_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}
