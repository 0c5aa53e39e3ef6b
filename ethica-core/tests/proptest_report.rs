//! Property-based tests for report aggregation using proptest.

use proptest::prelude::*;
use std::collections::HashSet;

use ethica_core::{
    AggregateReport, CheckEngine, CheckSpec, CheckStatus, FrameworkSpec, OverallStatus, Severity,
    SpecMetadata,
};

const PRINCIPLES: [&str; 4] = ["transparency", "fairness", "privacy", "accountability"];

/// Evidence state of one generated file-exists check.
#[derive(Debug, Clone, Copy)]
enum Evidence {
    Present,
    Absent,
    Unconfigured,
}

fn evidence() -> impl Strategy<Value = Evidence> {
    prop_oneof![
        Just(Evidence::Present),
        Just(Evidence::Absent),
        Just(Evidence::Unconfigured),
    ]
}

fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Error),
        Just(Severity::Warning),
        Just(Severity::Info),
    ]
}

fn checks() -> impl Strategy<Value = Vec<(usize, Severity, Evidence)>> {
    prop::collection::vec((0..PRINCIPLES.len(), severity(), evidence()), 0..24)
}

/// Build a spec plus a project directory holding the "present" evidence.
fn scenario(checks: &[(usize, Severity, Evidence)]) -> (FrameworkSpec, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut specs = Vec::new();

    for (i, (principle, severity, evidence)) in checks.iter().enumerate() {
        let file = format!("evidence-{i}.md");
        let config = match evidence {
            Evidence::Present => {
                std::fs::write(dir.path().join(&file), "ok").unwrap();
                format!("paths: [{file}]")
            }
            Evidence::Absent => format!("paths: [{file}]"),
            Evidence::Unconfigured => "paths: []".to_string(),
        };
        specs.push(CheckSpec {
            id: format!("c-{i}"),
            name: format!("Check {i}"),
            principle: PRINCIPLES[*principle].to_string(),
            check_type: "file-exists".to_string(),
            severity: *severity,
            description: String::new(),
            config: serde_yaml::from_str(&config).unwrap(),
            help_url: None,
        });
    }

    let spec = FrameworkSpec {
        metadata: SpecMetadata {
            id: "prop".into(),
            name: "Property framework".into(),
            version: "1".into(),
            description: String::new(),
            license: None,
            maintainer: None,
            source_url: None,
        },
        principles: Vec::new(),
        checks: specs,
        compliance_levels: None,
    };
    (spec, dir)
}

fn run(checks: &[(usize, Severity, Evidence)]) -> AggregateReport {
    let (spec, dir) = scenario(checks);
    CheckEngine::new(&spec).run_checks(dir.path())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn counts_are_conserved(checks in checks()) {
        let report = run(&checks);
        prop_assert_eq!(report.total_checks, checks.len());
        prop_assert_eq!(
            report.checks_passed + report.checks_failed + report.checks_skipped,
            report.total_checks
        );
        prop_assert_eq!(report.results().count(), report.total_checks);
        for principle in &report.principles {
            prop_assert_eq!(
                principle.passed + principle.failed + principle.skipped,
                principle.checks.len()
            );
        }
    }

    #[test]
    fn pass_rate_matches_formula(checks in checks()) {
        let report = run(&checks);
        let expected = if report.total_checks == 0 {
            0.0
        } else {
            report.checks_passed as f64 / report.total_checks as f64
        };
        prop_assert_eq!(report.pass_rate, expected);
        prop_assert!((0.0..=1.0).contains(&report.pass_rate));
    }

    #[test]
    fn overall_status_follows_failures(checks in checks()) {
        let report = run(&checks);
        let blocking = checks
            .iter()
            .any(|(_, s, e)| *s == Severity::Error && matches!(e, Evidence::Absent));
        let any_failed = checks.iter().any(|(_, _, e)| matches!(e, Evidence::Absent));

        let expected = if blocking {
            OverallStatus::Failed
        } else if any_failed {
            OverallStatus::PassedWithWarnings
        } else {
            OverallStatus::Passed
        };
        prop_assert_eq!(report.overall_status, expected);
        prop_assert_eq!(report.overall_status_color, expected.color());
    }

    #[test]
    fn principle_status_follows_tallies(checks in checks()) {
        let report = run(&checks);
        for principle in &report.principles {
            let expected = if principle.failed > 0 {
                CheckStatus::Failed
            } else if principle.passed > 0 {
                CheckStatus::Passed
            } else {
                CheckStatus::Skipped
            };
            prop_assert_eq!(principle.status, expected);
        }
    }

    #[test]
    fn principles_appear_once_in_first_seen_order(checks in checks()) {
        let report = run(&checks);
        let mut expected = Vec::new();
        let mut seen = HashSet::new();
        for (principle, _, _) in &checks {
            if seen.insert(*principle) {
                expected.push(PRINCIPLES[*principle]);
            }
        }
        let actual: Vec<&str> = report.principles.iter().map(|p| p.id.as_str()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn json_round_trip_is_lossless(checks in checks()) {
        let report = run(&checks);
        let json = report.to_json().unwrap();
        prop_assert_eq!(AggregateReport::from_json(&json).unwrap(), report);
    }
}
