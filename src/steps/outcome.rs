use serde::{Deserialize, Serialize};

use crate::feature::feature_model::Scenario;

/// Lifecycle of one scenario execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    NotStarted,
    Running,
    /// Every step passed
    Passed,
    /// A step's expectation did not hold
    Failed,
    /// A step could not run (browser failure, undefined step, panic, timeout)
    Errored,
}

impl ScenarioStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScenarioStatus::Passed | ScenarioStatus::Failed | ScenarioStatus::Errored)
    }
}

/// What happened to one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Passed,
    Failed,
    Errored,
    /// Not executed because an earlier step did not pass
    Skipped,
}

impl StepOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepOutcome::Passed => "passed",
            StepOutcome::Failed => "failed",
            StepOutcome::Errored => "errored",
            StepOutcome::Skipped => "skipped",
        }
    }
}

/// Report line for one step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepReport {
    /// 0-based position in the scenario
    pub index: usize,
    pub keyword: String,
    pub text: String,
    pub outcome: StepOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub duration_ms: u128,
}

/// Result of running one scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioResult {
    pub feature: String,
    pub scenario: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: ScenarioStatus,
    pub steps: Vec<StepReport>,

    /// Message of the first step that did not pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub duration_ms: u128,
}

impl ScenarioResult {
    /// A scenario that never got to run its steps (e.g. no session could be opened).
    pub fn not_run(feature: &str, scenario: &Scenario, message: String) -> Self {
        ScenarioResult {
            feature: feature.to_string(),
            scenario: scenario.name.clone(),
            tags: scenario.tags.clone(),
            status: ScenarioStatus::Errored,
            steps: scenario
                .steps
                .iter()
                .enumerate()
                .map(|(index, step)| StepReport {
                    index,
                    keyword: step.keyword.clone(),
                    text: step.text.clone(),
                    outcome: StepOutcome::Skipped,
                    message: None,
                    duration_ms: 0,
                })
                .collect(),
            error: Some(message),
            duration_ms: 0,
        }
    }

    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }

    pub fn count(&self, outcome: StepOutcome) -> usize {
        self.steps.iter().filter(|s| s.outcome == outcome).count()
    }

    /// The step that ended the scenario, if any.
    pub fn first_problem(&self) -> Option<&StepReport> {
        self.steps
            .iter()
            .find(|s| matches!(s.outcome, StepOutcome::Failed | StepOutcome::Errored))
    }
}
