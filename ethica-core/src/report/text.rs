//! Human-readable terminal report.

use super::ansi::{self, BOLD, DIM, GREEN, RED, YELLOW};
use super::{AggregateReport, OverallStatus, principle_name};
use crate::model::{CheckStatus, Principle, Severity};

#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    /// Also list passed and skipped checks.
    pub verbose: bool,
    /// Emit ANSI colors.
    pub color: bool,
}

struct Painter(bool);

impl Painter {
    fn paint(&self, code: &str, text: &str) -> String {
        ansi::paint(self.0, code, text)
    }
}

/// Render a report grouped by principle, followed by a summary.
pub fn render_text(
    report: &AggregateReport,
    principles: &[Principle],
    options: &TextOptions,
) -> String {
    let p = Painter(options.color);
    let mut out = String::new();

    for principle in &report.principles {
        let (icon, color) = match principle.status {
            CheckStatus::Passed => ("✓", GREEN),
            CheckStatus::Failed => ("✗", RED),
            CheckStatus::Skipped => ("○", DIM),
        };
        out.push_str(&format!(
            "{} {}\n",
            p.paint(BOLD, principle_name(principles, &principle.id)),
            p.paint(color, icon)
        ));

        for check in &principle.checks {
            match check.status {
                CheckStatus::Failed => {
                    let color = if check.severity == Severity::Error {
                        RED
                    } else {
                        YELLOW
                    };
                    out.push_str(&format!(
                        "  {} {}: {}\n",
                        p.paint(color, "✗"),
                        check.name,
                        check.message
                    ));
                    if let Some(suggestion) = &check.suggestion {
                        let suggestion = suggestion.replace('\n', "\n      ");
                        out.push_str(&format!("    {}\n", p.paint(DIM, &format!("→ {suggestion}"))));
                    }
                }
                CheckStatus::Passed if options.verbose => {
                    out.push_str(&format!(
                        "  {} {}: {}\n",
                        p.paint(GREEN, "✓"),
                        check.name,
                        check.message
                    ));
                }
                CheckStatus::Skipped if options.verbose => {
                    out.push_str(&format!(
                        "  {}\n",
                        p.paint(DIM, &format!("○ {}: {}", check.name, check.message))
                    ));
                }
                _ => {}
            }
        }
        out.push('\n');
    }

    out.push_str(&format!("{}\n", p.paint(BOLD, "Summary:")));
    out.push_str(&format!(
        "Overall Status: {}\n",
        p.paint(
            report.overall_status_color.ansi(),
            &report.overall_status.to_string()
        )
    ));
    out.push_str(&format!("Pass Rate: {:.1}%\n", report.pass_rate * 100.0));
    out.push_str(&format!(
        "Checks Passed: {}/{}\n",
        report.checks_passed, report.total_checks
    ));

    if report.overall_status != OverallStatus::Passed && !options.verbose {
        out.push_str(&format!(
            "\n{}\n",
            p.paint(YELLOW, "Run with --verbose to see all check details")
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::sample_report;

    fn principles() -> Vec<Principle> {
        vec![Principle {
            id: "transparency".into(),
            name: "Transparency & Explainability".into(),
            weight: 1.0,
            description: None,
        }]
    }

    #[test]
    fn test_plain_render() {
        let text = render_text(&sample_report(), &principles(), &TextOptions::default());

        assert!(text.starts_with("Transparency & Explainability ✓\n"));
        // Unknown principle falls back to its id.
        assert!(text.contains("fairness ✗\n"));
        assert!(text.contains("  ✗ Check f-1: f-1 failed\n    → Fix f-1\n"));
        assert!(!text.contains("Check t-1"));
        assert!(text.contains("Overall Status: passed with warnings\n"));
        assert!(text.contains("Pass Rate: 33.3%\n"));
        assert!(text.contains("Checks Passed: 1/3\n"));
        assert!(text.contains("Run with --verbose"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_verbose_lists_passed_and_skipped() {
        let options = TextOptions {
            verbose: true,
            color: false,
        };
        let text = render_text(&sample_report(), &principles(), &options);
        assert!(text.contains("  ✓ Check t-1: t-1 passed\n"));
        assert!(text.contains("  ○ Check t-2: t-2 skipped\n"));
        assert!(!text.contains("Run with --verbose"));
    }

    #[test]
    fn test_color_render() {
        let options = TextOptions {
            verbose: false,
            color: true,
        };
        let text = render_text(&sample_report(), &principles(), &options);
        assert!(text.contains("\x1b[33mpassed with warnings\x1b[0m"));
    }

    #[test]
    fn test_multiline_suggestion_is_indented() {
        let mut report = sample_report();
        report.principles[1].checks[0].suggestion =
            Some("Install one of: shap\nSee: https://example.org".into());
        let text = render_text(&report, &[], &TextOptions::default());
        assert!(text.contains("    → Install one of: shap\n      See: https://example.org\n"));
    }
}
