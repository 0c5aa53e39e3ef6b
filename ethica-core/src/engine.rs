//! Check engine: runs a framework's checks and aggregates the results.

use std::collections::{HashMap, HashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::checks::{Check, CheckBase, CheckRegistry, MisconfiguredCheck};
use crate::model::{CheckResult, CheckStatus, FrameworkSpec};
use crate::report::{AggregateReport, OverallStatus, PrincipleReport};

/// Runnable form of a framework specification.
///
/// Checks of unknown type, and checks excluded by id, are dropped at
/// construction and never appear in a report.
pub struct CheckEngine {
    framework_id: String,
    framework_version: String,
    checks: Vec<Box<dyn Check>>,
}

impl CheckEngine {
    /// Build an engine with the built-in check variants.
    pub fn new(spec: &FrameworkSpec) -> Self {
        Self::with_registry(spec, &CheckRegistry::with_defaults(), &[])
    }

    /// Build an engine, skipping any check whose id is in `excluded`.
    pub fn with_registry(
        spec: &FrameworkSpec,
        registry: &CheckRegistry,
        excluded: &[String],
    ) -> Self {
        let excluded: HashSet<&str> = excluded.iter().map(String::as_str).collect();
        let mut checks: Vec<Box<dyn Check>> = Vec::with_capacity(spec.checks.len());

        for check_spec in &spec.checks {
            if excluded.contains(check_spec.id.as_str()) {
                debug!(check = %check_spec.id, "Check excluded by project configuration");
                continue;
            }
            if !registry.is_known(&check_spec.check_type) {
                warn!(
                    check = %check_spec.id,
                    check_type = %check_spec.check_type,
                    "Skipping check of unknown type"
                );
                continue;
            }
            match registry.build(check_spec) {
                Ok(check) => checks.push(check),
                Err(e) => {
                    warn!(check = %check_spec.id, error = %e, "Check configuration is invalid");
                    checks.push(Box::new(MisconfiguredCheck::new(check_spec, &e)));
                }
            }
        }

        Self {
            framework_id: spec.metadata.id.clone(),
            framework_version: spec.metadata.version.clone(),
            checks,
        }
    }

    /// Number of runnable checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Ids of the runnable checks, in declaration order.
    pub fn check_ids(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.id()).collect()
    }

    /// Run every check against `project_path` and aggregate the results.
    pub fn run_checks(&self, project_path: &Path) -> AggregateReport {
        info!(
            framework = %self.framework_id,
            project = %project_path.display(),
            checks = self.checks.len(),
            "Running compliance checks"
        );

        let mut principles: Vec<PrincipleReport> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for check in &self.checks {
            let result = run_isolated(check.as_ref(), project_path);
            debug!(check = %result.check_id, status = %result.status, "Check finished");

            let slot = *index.entry(check.principle()).or_insert_with(|| {
                principles.push(PrincipleReport::new(check.principle()));
                principles.len() - 1
            });
            principles[slot].record(result);
        }

        let total_checks = self.checks.len();
        let checks_passed: usize = principles.iter().map(|p| p.passed).sum();
        let checks_failed: usize = principles.iter().map(|p| p.failed).sum();
        let checks_skipped: usize = principles.iter().map(|p| p.skipped).sum();
        let pass_rate = if total_checks > 0 {
            checks_passed as f64 / total_checks as f64
        } else {
            0.0
        };
        let overall_status =
            OverallStatus::evaluate(principles.iter().flat_map(|p| p.checks.iter()));

        AggregateReport {
            framework_id: self.framework_id.clone(),
            framework_version: self.framework_version.clone(),
            principles,
            total_checks,
            checks_passed,
            checks_failed,
            checks_skipped,
            pass_rate,
            overall_status,
            overall_status_color: overall_status.color(),
        }
    }
}

/// Run one check, turning a panic into a failed result so siblings still run.
fn run_isolated(check: &dyn Check, project_path: &Path) -> CheckResult {
    match catch_unwind(AssertUnwindSafe(|| check.run(project_path))) {
        Ok(result) => result,
        Err(_) => {
            warn!(check = %check.id(), "Check panicked, recording as failed");
            failed_unexpectedly(check.base())
        }
    }
}

fn failed_unexpectedly(base: &CheckBase) -> CheckResult {
    base.result(
        CheckStatus::Failed,
        "Check raised an unexpected error",
        None,
    )
}
