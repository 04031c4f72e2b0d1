use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crate::feature::feature_model::{Feature, Scenario};
use crate::steps::error::StepError;
use crate::steps::outcome::ScenarioResult;
use crate::steps::registry::StepRegistry;
use crate::steps::runner::{ScenarioRunner, panic_message};
use crate::trace::logger::TraceLogger;

/// One scenario queued for execution.
struct Job<'f> {
    feature: &'f str,
    scenario: &'f Scenario,
}

/// Runs every scenario of a set of features, one world per scenario.
///
/// With `concurrency > 1` worker threads pull scenarios from a shared
/// queue. Worlds (and so browser sessions) are never shared between
/// scenarios, and results always come back in source order.
pub struct SuiteRunner<'a, W> {
    registry: &'a StepRegistry<W>,
    concurrency: usize,
    scenario_timeout: Option<Duration>,
    trace: Option<&'a TraceLogger>,
}

impl<'a, W> SuiteRunner<'a, W> {
    pub fn new(registry: &'a StepRegistry<W>) -> Self {
        SuiteRunner {
            registry,
            concurrency: 1,
            scenario_timeout: None,
            trace: None,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_scenario_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.scenario_timeout = timeout;
        self
    }

    pub fn with_trace(mut self, trace: &'a TraceLogger) -> Self {
        self.trace = Some(trace);
        self
    }

    fn scenario_runner(&self) -> ScenarioRunner<'a, W> {
        let runner = ScenarioRunner::new(self.registry).with_timeout(self.scenario_timeout);
        match self.trace {
            Some(trace) => runner.with_trace(trace),
            None => runner,
        }
    }

    /// Run one scenario in a fresh world from `factory`.
    ///
    /// A panic anywhere in the job, the factory included, becomes an
    /// errored result for that scenario alone.
    fn run_job<F>(&self, job: &Job<'_>, factory: &F) -> ScenarioResult
    where
        F: Fn() -> Result<W, StepError>,
    {
        let attempt = catch_unwind(AssertUnwindSafe(|| match factory() {
            Ok(mut world) => self.scenario_runner().run(&mut world, job.feature, job.scenario),
            Err(e) => {
                tracing::warn!(scenario = %job.scenario.name, error = %e, "could not create scenario context");
                ScenarioResult::not_run(job.feature, job.scenario, format!("could not start scenario: {}", e))
            }
        }));

        attempt.unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            tracing::warn!(scenario = %job.scenario.name, panic = %message, "scenario panicked");
            ScenarioResult::not_run(job.feature, job.scenario, format!("scenario panicked: {}", message))
        })
    }

    /// Run all scenarios of `features`; `factory` builds each scenario's world.
    pub fn run<F>(&self, features: &[Feature], factory: F) -> Vec<ScenarioResult>
    where
        F: Fn() -> Result<W, StepError> + Sync,
    {
        let jobs: Vec<Job<'_>> = features
            .iter()
            .flat_map(|f| {
                f.scenarios.iter().map(move |scenario| Job {
                    feature: &f.name,
                    scenario,
                })
            })
            .collect();

        let workers = self.concurrency.min(jobs.len());
        tracing::info!(scenarios = jobs.len(), workers, "running suite");

        if workers <= 1 {
            return jobs.iter().map(|job| self.run_job(job, &factory)).collect();
        }

        let next = AtomicUsize::new(0);
        let slots: Mutex<Vec<Option<ScenarioResult>>> = Mutex::new((0..jobs.len()).map(|_| None).collect());

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    loop {
                        let index = next.fetch_add(1, Ordering::SeqCst);
                        let Some(job) = jobs.get(index) else {
                            break;
                        };
                        let result = self.run_job(job, &factory);
                        slots.lock().unwrap_or_else(PoisonError::into_inner)[index] = Some(result);
                    }
                });
            }
        });

        slots
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_iter()
            .zip(&jobs)
            .map(|(slot, job)| {
                slot.unwrap_or_else(|| {
                    ScenarioResult::not_run(job.feature, job.scenario, "scenario worker stopped early".to_string())
                })
            })
            .collect()
    }
}
