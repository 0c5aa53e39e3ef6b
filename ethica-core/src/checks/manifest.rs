//! Python dependency manifest scanning (requirements files, pyproject.toml, setup.py).
//!
//! Everything here is best-effort: unreadable or malformed manifests
//! contribute nothing instead of failing the check that asked.

use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Requirements-style files scanned, relative to the project root.
pub const REQUIREMENTS_FILES: &[&str] = &[
    "requirements.txt",
    "requirements-dev.txt",
    "requirements/base.txt",
    "requirements/dev.txt",
];

pub const PYPROJECT_FILE: &str = "pyproject.toml";
pub const SETUP_PY_FILE: &str = "setup.py";

static LEADING_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z0-9_-]+)").expect("valid regex"));
static QUOTED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']([A-Za-z0-9_-]+)"#).expect("valid regex"));
static TABLE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"?([A-Za-z0-9_-]+)"?\s*="#).expect("valid regex"));
static INSTALL_REQUIRES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)install_requires\s*=\s*\[(.*?)\]").expect("valid regex")
});

/// Collect the lowercase names of all dependencies declared by a project.
pub fn declared_dependencies(project_path: &Path) -> BTreeSet<String> {
    let mut deps = BTreeSet::new();

    for file in REQUIREMENTS_FILES {
        if let Some(content) = read_manifest(&project_path.join(file)) {
            deps.extend(parse_requirements(&content));
        }
    }

    if let Some(content) = read_manifest(&project_path.join(PYPROJECT_FILE)) {
        deps.extend(parse_pyproject(&content));
    }

    if let Some(content) = read_manifest(&project_path.join(SETUP_PY_FILE)) {
        deps.extend(parse_setup_py(&content));
    }

    debug!(project = %project_path.display(), count = deps.len(), "Collected declared dependencies");
    deps
}

fn read_manifest(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping unreadable manifest");
            None
        }
    }
}

/// Leading package token of a requirement string, lowercased.
///
/// `numpy>=1.20`, `requests[security]==2.31`, and `Flask ; python_version>"3"`
/// yield `numpy`, `requests`, and `flask`.
pub fn package_name(requirement: &str) -> Option<String> {
    LEADING_NAME
        .captures(requirement)
        .map(|c| c[1].to_lowercase())
}

/// Parse a requirements.txt style file.
pub fn parse_requirements(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        // Skip blanks, comments, and pip options (-r, -e, --index-url, ...)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(package_name)
        .collect()
}

/// Parse pyproject.toml dependency declarations.
///
/// Reads PEP 621 `[project]` dependencies and optional dependencies plus
/// Poetry dependency tables. Falls back to line scanning when the file is
/// not valid TOML.
pub fn parse_pyproject(content: &str) -> BTreeSet<String> {
    let doc: toml::Value = match toml::from_str(content) {
        Ok(doc) => doc,
        Err(e) => {
            debug!(error = %e, "pyproject.toml is not valid TOML, falling back to line scan");
            return scan_pyproject_lines(content);
        }
    };

    let mut deps = BTreeSet::new();

    if let Some(project) = doc.get("project") {
        if let Some(list) = project.get("dependencies").and_then(|d| d.as_array()) {
            deps.extend(requirement_strings(list));
        }
        if let Some(groups) = project
            .get("optional-dependencies")
            .and_then(|d| d.as_table())
        {
            for list in groups.values().filter_map(|v| v.as_array()) {
                deps.extend(requirement_strings(list));
            }
        }
    }

    if let Some(poetry) = doc.get("tool").and_then(|t| t.get("poetry")) {
        let mut tables = Vec::new();
        tables.extend(poetry.get("dependencies").and_then(|d| d.as_table()));
        tables.extend(poetry.get("dev-dependencies").and_then(|d| d.as_table()));
        if let Some(groups) = poetry.get("group").and_then(|g| g.as_table()) {
            tables.extend(
                groups
                    .values()
                    .filter_map(|g| g.get("dependencies").and_then(|d| d.as_table())),
            );
        }
        for table in tables {
            deps.extend(
                table
                    .keys()
                    .filter(|name| name.as_str() != "python")
                    .map(|name| name.to_lowercase()),
            );
        }
    }

    deps
}

fn requirement_strings(list: &[toml::Value]) -> impl Iterator<Item = String> + '_ {
    list.iter()
        .filter_map(|v| v.as_str())
        .filter_map(package_name)
}

/// Line-oriented pyproject scan for files the TOML parser rejects.
fn scan_pyproject_lines(content: &str) -> BTreeSet<String> {
    let mut deps = BTreeSet::new();
    let mut in_dep_table = false;
    let mut in_dep_array = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && !in_dep_array {
            in_dep_table = line.to_lowercase().contains("dependencies");
            continue;
        }

        if let Some(pos) = line.find("dependencies = [") {
            let rest = &line[pos + "dependencies = [".len()..];
            deps.extend(quoted_names(rest));
            in_dep_array = !rest.contains(']');
            continue;
        }

        if in_dep_array {
            deps.extend(quoted_names(line));
            if line.contains(']') {
                in_dep_array = false;
            }
            continue;
        }

        if in_dep_table
            && let Some(caps) = TABLE_KEY.captures(line)
        {
            let name = caps[1].to_lowercase();
            if name != "python" {
                deps.insert(name);
            }
        }
    }

    deps
}

fn quoted_names(fragment: &str) -> impl Iterator<Item = String> + '_ {
    QUOTED_NAME
        .captures_iter(fragment)
        .map(|c| c[1].to_lowercase())
}

/// Parse the literal `install_requires=[...]` list of a setup.py script.
pub fn parse_setup_py(content: &str) -> BTreeSet<String> {
    INSTALL_REQUIRES
        .captures_iter(content)
        .flat_map(|c| {
            quoted_names(c.get(1).map_or("", |m| m.as_str()))
                .collect::<Vec<_>>()
        })
        .collect()
}
