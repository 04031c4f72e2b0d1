use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::steps::outcome::StepReport;

/// One JSONL line in the scenario trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,

    pub feature: String,
    pub scenario: String,

    pub step_index: usize,
    pub step: String,
    pub outcome: String,

    pub duration_ms: u128,
    pub message: Option<String>,
}

impl TraceEvent {
    pub fn for_step(feature: &str, scenario: &str, report: &StepReport) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            feature: feature.to_string(),
            scenario: scenario.to_string(),
            step_index: report.index,
            step: format!("{} {}", report.keyword, report.text),
            outcome: report.outcome.as_str().to_string(),
            duration_ms: report.duration_ms,
            message: report.message.clone(),
        }
    }
}
