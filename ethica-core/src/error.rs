//! Error types for the Ethica core crate.

use std::path::PathBuf;
use thiserror::Error;

/// Catalog- and configuration-level errors.
///
/// These abort the current command. Problems found while evaluating a single
/// check never show up here; they are reported as check results instead.
#[derive(Debug, Error)]
pub enum EthicaError {
    #[error("Framework '{id}' not found in registry. Available frameworks: {}", available_list(.available))]
    NotFound { id: String, available: Vec<String> },
    #[error("Framework specification for '{id}' not found at {}", .path.display())]
    SpecMissing { id: String, path: PathBuf },
    #[error("No {} found. Run `ethica init` first.", .path.display())]
    ConfigMissing { path: PathBuf },
    #[error("Configuration file {} already exists. Use --force to overwrite.", .path.display())]
    ConfigExists { path: PathBuf },
    #[error("Framework id '{id}' is listed more than once in the registry")]
    DuplicateFramework { id: String },
    #[error("No enabled framework in the project configuration")]
    NoFrameworkSelected,
    #[error("invalid document {}: {message}", .path.display())]
    InvalidDocument { path: PathBuf, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn available_list(ids: &[String]) -> String {
    if ids.is_empty() {
        "none".to_string()
    } else {
        ids.join(", ")
    }
}

/// A check spec whose `config` map cannot be read by its variant.
#[derive(Debug, Error)]
pub enum CheckConfigError {
    #[error("invalid config for check '{check_id}': {message}")]
    Invalid { check_id: String, message: String },
    #[error("unknown check type '{0}'")]
    UnknownType(String),
}
