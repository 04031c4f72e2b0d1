use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};

use crate::feature::feature_model::{Scenario, ScenarioStep};
use crate::steps::error::StepError;
use crate::steps::outcome::{ScenarioResult, ScenarioStatus, StepOutcome, StepReport};
use crate::steps::registry::StepRegistry;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

/// Executes scenarios step-by-step against a step registry.
///
/// Steps run strictly in order. The first step that does not pass ends the
/// scenario: an assertion failure marks it `Failed`, any other error marks
/// it `Errored`, and every later step is reported `Skipped` without being
/// invoked.
pub struct ScenarioRunner<'a, W> {
    registry: &'a StepRegistry<W>,
    scenario_timeout: Option<Duration>,
    trace: Option<&'a TraceLogger>,
}

impl<'a, W> ScenarioRunner<'a, W> {
    pub fn new(registry: &'a StepRegistry<W>) -> Self {
        ScenarioRunner {
            registry,
            scenario_timeout: None,
            trace: None,
        }
    }

    /// Abort scenarios that run longer than `timeout`.
    ///
    /// Checked between steps; a running step is never interrupted.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.scenario_timeout = timeout;
        self
    }

    pub fn with_trace(mut self, trace: &'a TraceLogger) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Run one scenario with `world` as its context.
    pub fn run(&self, world: &mut W, feature: &str, scenario: &Scenario) -> ScenarioResult {
        let started = Instant::now();
        let mut status = ScenarioStatus::NotStarted;
        let mut first_error: Option<String> = None;
        let mut reports = Vec::with_capacity(scenario.steps.len());

        tracing::info!(feature, scenario = %scenario.name, "scenario started");

        match guarded(|| self.registry.run_before(world)) {
            Ok(()) => status = ScenarioStatus::Running,
            Err(e) => {
                tracing::warn!(scenario = %scenario.name, error = %e, "before-scenario hook failed");
                status = ScenarioStatus::Errored;
                first_error = Some(format!("before-scenario hook: {}", e));
            }
        }

        for (index, step) in scenario.steps.iter().enumerate() {
            if status != ScenarioStatus::Running {
                let skipped = step_report(index, step, StepOutcome::Skipped, None, 0);
                reports.push(self.record(feature, scenario, skipped));
                continue;
            }

            let step_started = Instant::now();
            let result = match self.timed_out(started) {
                Some(e) => Err(e),
                None => self
                    .registry
                    .resolve(&step.text)
                    .and_then(|matched| guarded(|| matched.binding.invoke(world, &matched.args))),
            };
            let elapsed = step_started.elapsed().as_millis();

            let report = match result {
                Ok(()) => step_report(index, step, StepOutcome::Passed, None, elapsed),
                Err(e) => {
                    let (outcome, next) = if e.is_assertion() {
                        (StepOutcome::Failed, ScenarioStatus::Failed)
                    } else {
                        (StepOutcome::Errored, ScenarioStatus::Errored)
                    };
                    tracing::warn!(
                        scenario = %scenario.name,
                        step = %step.text,
                        outcome = outcome.as_str(),
                        error = %e,
                        "step did not pass"
                    );
                    status = next;
                    let message = e.to_string();
                    first_error = Some(message.clone());
                    step_report(index, step, outcome, Some(message), elapsed)
                }
            };
            reports.push(self.record(feature, scenario, report));
        }

        if status == ScenarioStatus::Running {
            status = ScenarioStatus::Passed;
        }

        // After-hooks always run; they can only turn a pass into an error.
        if let Err(e) = guarded(|| self.registry.run_after(world)) {
            tracing::warn!(scenario = %scenario.name, error = %e, "after-scenario hook failed");
            if status == ScenarioStatus::Passed {
                status = ScenarioStatus::Errored;
                first_error = Some(format!("after-scenario hook: {}", e));
            }
        }

        let duration_ms = started.elapsed().as_millis();
        tracing::info!(scenario = %scenario.name, ?status, duration_ms = duration_ms as u64, "scenario finished");

        ScenarioResult {
            feature: feature.to_string(),
            scenario: scenario.name.clone(),
            tags: scenario.tags.clone(),
            status,
            steps: reports,
            error: first_error,
            duration_ms,
        }
    }

    fn timed_out(&self, started: Instant) -> Option<StepError> {
        let timeout = self.scenario_timeout?;
        if started.elapsed() > timeout {
            Some(StepError::TimedOut {
                timeout_ms: timeout.as_millis() as u64,
            })
        } else {
            None
        }
    }

    fn record(&self, feature: &str, scenario: &Scenario, report: StepReport) -> StepReport {
        if let Some(trace) = self.trace {
            trace.log(&TraceEvent::for_step(feature, &scenario.name, &report));
        }
        report
    }
}

fn step_report(
    index: usize,
    step: &ScenarioStep,
    outcome: StepOutcome,
    message: Option<String>,
    duration_ms: u128,
) -> StepReport {
    StepReport {
        index,
        keyword: step.keyword.clone(),
        text: step.text.clone(),
        outcome,
        message,
        duration_ms,
    }
}

/// Run `f`, turning a panic into `StepError::Panicked`.
fn guarded<F>(f: F) -> Result<(), StepError>
where
    F: FnOnce() -> Result<(), StepError>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(StepError::Panicked(panic_message(payload.as_ref()))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
