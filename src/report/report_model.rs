use serde::{Deserialize, Serialize};

use crate::steps::outcome::{ScenarioResult, ScenarioStatus, StepOutcome};

// ============================================================================
// Suite report: aggregates ScenarioResults
// ============================================================================

/// Aggregated report for one suite run.
///
/// Built from a `Vec<ScenarioResult>` via `from_results()`. Consumed by
/// the console, HTML and JUnit reporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub suite_name: String,

    pub total: usize,

    pub passed: usize,

    /// Scenarios whose expectation did not hold
    pub failed: usize,

    /// Scenarios that could not run to completion
    pub errored: usize,

    /// Total execution duration in milliseconds (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    pub scenarios: Vec<ScenarioResult>,
}

impl SuiteReport {
    pub fn from_results(suite_name: &str, results: Vec<ScenarioResult>) -> Self {
        let count = |status: ScenarioStatus| results.iter().filter(|r| r.status == status).count();
        Self {
            suite_name: suite_name.to_string(),
            total: results.len(),
            passed: count(ScenarioStatus::Passed),
            failed: count(ScenarioStatus::Failed),
            errored: results
                .iter()
                .filter(|r| !matches!(r.status, ScenarioStatus::Passed | ScenarioStatus::Failed))
                .count(),
            duration_ms: None,
            scenarios: results,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }

    /// Skipped steps across every scenario.
    pub fn skipped_steps(&self) -> usize {
        self.scenarios.iter().map(|s| s.count(StepOutcome::Skipped)).sum()
    }
}

/// Short label for a scenario status.
pub fn status_label(status: ScenarioStatus) -> &'static str {
    match status {
        ScenarioStatus::Passed => "PASS",
        ScenarioStatus::Failed => "FAIL",
        ScenarioStatus::Errored => "ERROR",
        ScenarioStatus::Running => "RUNNING",
        ScenarioStatus::NotStarted => "NOT RUN",
    }
}
