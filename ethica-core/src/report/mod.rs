//! Compliance report model and renderers (text, JSON, Markdown).

pub mod markdown;
pub mod text;

/// ANSI escape codes shared by the terminal renderer and the CLI.
pub mod ansi {
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const DIM: &str = "\x1b[90m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";

    /// Wrap `text` in `code` when `enabled`.
    pub fn paint(enabled: bool, code: &str, text: &str) -> String {
        if enabled {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::model::{CheckResult, CheckStatus, Principle};

pub use markdown::render_markdown;
pub use text::{TextOptions, render_text};

/// Aggregated results of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub framework_id: String,
    pub framework_version: String,
    /// Per-principle buckets in first-seen order.
    pub principles: Vec<PrincipleReport>,
    pub total_checks: usize,
    pub checks_passed: usize,
    pub checks_failed: usize,
    pub checks_skipped: usize,
    /// `checks_passed / total_checks`, or 0.0 when nothing ran.
    pub pass_rate: f64,
    pub overall_status: OverallStatus,
    pub overall_status_color: StatusColor,
}

impl AggregateReport {
    /// All check results across principles, in report order.
    pub fn results(&self) -> impl Iterator<Item = &CheckResult> {
        self.principles.iter().flat_map(|p| p.checks.iter())
    }

    /// Whether any check failed with `error` severity.
    pub fn has_blocking_failures(&self) -> bool {
        self.results().any(CheckResult::is_blocking)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Results for all checks grouped under one principle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipleReport {
    pub id: String,
    pub checks: Vec<CheckResult>,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub status: CheckStatus,
}

impl PrincipleReport {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            checks: Vec::new(),
            passed: 0,
            failed: 0,
            skipped: 0,
            status: CheckStatus::Skipped,
        }
    }

    /// Add a result and update the tallies and status.
    pub fn record(&mut self, result: CheckResult) {
        match result.status {
            CheckStatus::Passed => self.passed += 1,
            CheckStatus::Failed => self.failed += 1,
            CheckStatus::Skipped => self.skipped += 1,
        }
        self.checks.push(result);
        self.status = if self.failed > 0 {
            CheckStatus::Failed
        } else if self.passed > 0 {
            CheckStatus::Passed
        } else {
            CheckStatus::Skipped
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    #[serde(rename = "passed")]
    Passed,
    #[serde(rename = "passed with warnings")]
    PassedWithWarnings,
    #[serde(rename = "failed")]
    Failed,
}

impl OverallStatus {
    /// `Failed` iff an error-severity check failed, `PassedWithWarnings` iff
    /// any other check failed, `Passed` otherwise.
    pub fn evaluate<'a>(results: impl IntoIterator<Item = &'a CheckResult>) -> Self {
        let mut any_failed = false;
        for result in results {
            if result.is_blocking() {
                return OverallStatus::Failed;
            }
            any_failed |= result.status == CheckStatus::Failed;
        }
        if any_failed {
            OverallStatus::PassedWithWarnings
        } else {
            OverallStatus::Passed
        }
    }

    pub fn color(self) -> StatusColor {
        match self {
            OverallStatus::Passed => StatusColor::Green,
            OverallStatus::PassedWithWarnings => StatusColor::Yellow,
            OverallStatus::Failed => StatusColor::Red,
        }
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallStatus::Passed => write!(f, "passed"),
            OverallStatus::PassedWithWarnings => write!(f, "passed with warnings"),
            OverallStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
}

impl StatusColor {
    pub fn ansi(self) -> &'static str {
        match self {
            StatusColor::Green => ansi::GREEN,
            StatusColor::Yellow => ansi::YELLOW,
            StatusColor::Red => ansi::RED,
        }
    }
}

/// Output representation of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    /// File extension used when saving a report.
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "md",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            other => Err(format!(
                "Unknown output format: {other} (expected text, json, or markdown)"
            )),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Render a report in the requested format.
///
/// `principles` supplies display names; unknown ids fall back to the id.
pub fn render(
    report: &AggregateReport,
    format: ReportFormat,
    principles: &[Principle],
    options: &TextOptions,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(render_text(report, principles, options)),
        ReportFormat::Json => report.to_json(),
        ReportFormat::Markdown => Ok(render_markdown(report, principles)),
    }
}

pub(crate) fn principle_name<'a>(principles: &'a [Principle], id: &'a str) -> &'a str {
    principles
        .iter()
        .find(|p| p.id == id)
        .map_or(id, |p| p.name.as_str())
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::model::Severity;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_principle_status_rules() {
        let mut p = PrincipleReport::new("privacy");
        assert_eq!(p.status, CheckStatus::Skipped);
        p.record(result("a", CheckStatus::Skipped, Severity::Error));
        assert_eq!(p.status, CheckStatus::Skipped);
        p.record(result("b", CheckStatus::Passed, Severity::Error));
        assert_eq!(p.status, CheckStatus::Passed);
        p.record(result("c", CheckStatus::Failed, Severity::Info));
        assert_eq!(p.status, CheckStatus::Failed);
        assert_eq!((p.passed, p.failed, p.skipped), (1, 1, 1));
    }

    #[test]
    fn test_overall_status_rules() {
        let passed = result("a", CheckStatus::Passed, Severity::Error);
        let warn = result("b", CheckStatus::Failed, Severity::Warning);
        let info = result("c", CheckStatus::Failed, Severity::Info);
        let error = result("d", CheckStatus::Failed, Severity::Error);

        assert_eq!(OverallStatus::evaluate([&passed]), OverallStatus::Passed);
        assert_eq!(OverallStatus::evaluate([]), OverallStatus::Passed);
        assert_eq!(
            OverallStatus::evaluate([&passed, &warn, &info]),
            OverallStatus::PassedWithWarnings
        );
        assert_eq!(
            OverallStatus::evaluate([&passed, &warn, &error]),
            OverallStatus::Failed
        );
        assert_eq!(OverallStatus::Failed.color(), StatusColor::Red);
    }

    #[test]
    fn test_overall_status_serializes_with_spaces() {
        let json = serde_json::to_string(&OverallStatus::PassedWithWarnings).unwrap();
        assert_eq!(json, "\"passed with warnings\"");
        assert_eq!(serde_json::to_string(&StatusColor::Yellow).unwrap(), "\"yellow\"");
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample_report();
        let json = report.to_json().unwrap();
        assert_eq!(AggregateReport::from_json(&json).unwrap(), report);
    }

    #[test]
    fn test_json_field_names() {
        let value = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(value["overall_status"], "passed with warnings");
        assert_eq!(value["overall_status_color"], "yellow");
        assert_eq!(value["principles"][0]["status"], "passed");
        assert_eq!(value["principles"][0]["checks"][0]["id"], "t-1");
        assert!(!sample_report().has_blocking_failures());
    }

    #[test]
    fn test_report_format_parsing() {
        assert_eq!("json".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!("MD".parse::<ReportFormat>(), Ok(ReportFormat::Markdown));
        assert!("xml".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::default(), ReportFormat::Text);
    }
}
