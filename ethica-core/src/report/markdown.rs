//! Markdown report generator: compliance reports for docs and pull requests.

use super::{AggregateReport, principle_name};
use crate::model::{CheckStatus, Principle};

/// Generate a Markdown report.
pub fn render_markdown(report: &AggregateReport, principles: &[Principle]) -> String {
    let mut md = String::new();

    md.push_str(&format!(
        "# Ethics Compliance Report: {} ({})\n\n",
        report.framework_id, report.framework_version
    ));

    md.push_str("## Summary\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Overall Status | {} |\n", report.overall_status));
    md.push_str(&format!("| Pass Rate | {:.1}% |\n", report.pass_rate * 100.0));
    md.push_str(&format!("| Passed | {} |\n", report.checks_passed));
    md.push_str(&format!("| Failed | {} |\n", report.checks_failed));
    md.push_str(&format!("| Skipped | {} |\n", report.checks_skipped));
    md.push_str(&format!("| **Total** | **{}** |\n\n", report.total_checks));

    if report.principles.is_empty() {
        md.push_str("No checks were run.\n");
        return md;
    }

    md.push_str("## Principles\n\n");

    for principle in &report.principles {
        md.push_str(&format!(
            "### {}: {}\n\n",
            principle_name(principles, &principle.id),
            principle.status
        ));
        md.push_str("| Check | Severity | Status | Details |\n");
        md.push_str("|-------|----------|--------|---------|\n");

        for check in &principle.checks {
            md.push_str(&format!(
                "| {} | {} | {} {} | {} |\n",
                escape_cell(&check.name),
                check.severity,
                status_icon(check.status),
                check.status,
                escape_cell(&check.message),
            ));
        }
        md.push('\n');

        let suggestions: Vec<_> = principle
            .checks
            .iter()
            .filter(|c| c.status == CheckStatus::Failed)
            .filter_map(|c| c.suggestion.as_ref().map(|s| (c, s)))
            .collect();
        if !suggestions.is_empty() {
            md.push_str("**Suggestions:**\n\n");
            for (check, suggestion) in suggestions {
                md.push_str(&format!(
                    "- `{}`: {}\n",
                    check.check_id,
                    suggestion.replace('\n', " ")
                ));
            }
            md.push('\n');
        }
    }

    md
}

fn status_icon(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Passed => "✅",
        CheckStatus::Failed => "❌",
        CheckStatus::Skipped => "⏭️",
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
