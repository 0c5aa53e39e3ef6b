//! Ethica core: AI ethics compliance checks for project directories.
//!
//! A framework document declares ethical principles and the checks that
//! gather evidence for them. The [`FrameworkRegistry`] finds and loads those
//! documents, the [`CheckEngine`] runs their checks against a project, and
//! the [`report`] module aggregates and renders the outcome.
//!
//! ```no_run
//! use ethica_core::{CheckEngine, FrameworkRegistry};
//! use std::path::Path;
//!
//! let registry = FrameworkRegistry::builtin()?;
//! let spec = registry.load_spec("unesco-2021")?;
//! let report = CheckEngine::new(&spec).run_checks(Path::new("."));
//! println!("{:.1}%", report.pass_rate * 100.0);
//! # Ok::<(), ethica_core::EthicaError>(())
//! ```

pub mod checks;
pub mod engine;
pub mod error;
pub mod model;
pub mod project;
pub mod registry;
pub mod report;
pub mod settings;
pub mod templates;
pub mod validate;

pub use checks::{Check, CheckBase, CheckRegistry};
pub use engine::CheckEngine;
pub use error::{CheckConfigError, EthicaError};
pub use model::{
    CheckResult, CheckSpec, CheckStatus, ComplianceLevel, FrameworkMetadata, FrameworkSpec,
    Principle, Severity, SpecMetadata,
};
pub use project::{InitOutcome, PROJECT_CONFIG_FILE, ProjectConfig, init_project};
pub use registry::{CatalogSource, FrameworkRegistry};
pub use report::{AggregateReport, OverallStatus, PrincipleReport, ReportFormat, StatusColor};
pub use settings::{Settings, SettingsOverrides, load_settings};
pub use validate::{IssueLevel, ValidationIssue, validate_spec};
