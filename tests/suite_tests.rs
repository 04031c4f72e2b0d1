use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use page_scenarios::{
    feature::feature_model::{Feature, Scenario},
    steps::{
        error::StepError,
        outcome::{ScenarioStatus, StepOutcome},
        registry::StepRegistry,
    },
    suite::suite_runner::SuiteRunner,
    trace::logger::TraceLogger,
};

/// One world per scenario: claiming it twice means it was shared.
struct World {
    id: usize,
    claimed: bool,
}

fn claim_registry() -> StepRegistry<World> {
    let mut registry = StepRegistry::new();
    registry
        .register("I claim the world", |w: &mut World, _| {
            if w.claimed {
                return Err(StepError::assertion(
                    format!("world {} reused", w.id),
                    "a fresh world",
                    "a claimed world",
                ));
            }
            w.claimed = true;
            Ok(())
        })
        .unwrap()
        .register("I wait {int} ms", |_: &mut World, args| {
            std::thread::sleep(Duration::from_millis(args.int(0)? as u64));
            Ok(())
        })
        .unwrap()
        .register("the check fails", |_: &mut World, _| {
            Err(StepError::assertion("check failed", "yes", "no"))
        })
        .unwrap();
    registry
}

fn counting_factory(created: Arc<AtomicUsize>) -> impl Fn() -> Result<World, StepError> + Sync {
    move || {
        let id = created.fetch_add(1, Ordering::SeqCst);
        Ok(World { id, claimed: false })
    }
}

fn sleepy_features() -> Vec<Feature> {
    // Earlier scenarios sleep longer so parallel runs finish out of order.
    let first = (0..4)
        .map(|i| {
            let wait = format!("I wait {} ms", 40 - i * 10);
            Scenario::from_phrases(&format!("first {}", i), &["Given I claim the world", wait.as_str()])
        })
        .collect();
    let second = (0..3)
        .map(|i| Scenario::from_phrases(&format!("second {}", i), &["Given I claim the world"]))
        .collect();
    vec![Feature::new("First", first), Feature::new("Second", second)]
}

#[test]
fn sequential_run_keeps_order_and_fresh_worlds() {
    let registry = claim_registry();
    let created = Arc::new(AtomicUsize::new(0));

    let results = SuiteRunner::new(&registry).run(&sleepy_features(), counting_factory(Arc::clone(&created)));

    assert_eq!(results.len(), 7);
    assert_eq!(created.load(Ordering::SeqCst), 7);
    assert!(results.iter().all(|r| r.passed()), "{results:#?}");
    assert_eq!(results[0].feature, "First");
    assert_eq!(results[4].feature, "Second");
}

#[test]
fn parallel_run_returns_results_in_source_order() {
    let registry = claim_registry();
    let created = Arc::new(AtomicUsize::new(0));
    let features = sleepy_features();

    let results = SuiteRunner::new(&registry)
        .with_concurrency(4)
        .run(&features, counting_factory(Arc::clone(&created)));

    let names: Vec<_> = results.iter().map(|r| r.scenario.as_str()).collect();
    assert_eq!(
        names,
        vec!["first 0", "first 1", "first 2", "first 3", "second 0", "second 1", "second 2"]
    );
    assert_eq!(created.load(Ordering::SeqCst), 7);
    assert!(results.iter().all(|r| r.passed()), "{results:#?}");
}

#[test]
fn concurrency_is_at_least_one() {
    let registry = claim_registry();
    let created = Arc::new(AtomicUsize::new(0));
    let results = SuiteRunner::new(&registry)
        .with_concurrency(0)
        .run(&sleepy_features(), counting_factory(Arc::clone(&created)));
    assert_eq!(results.len(), 7);
}

#[test]
fn failures_stay_isolated_to_their_scenario() {
    let registry = claim_registry();
    let created = Arc::new(AtomicUsize::new(0));
    let features = vec![Feature::new(
        "Mixed",
        vec![
            Scenario::from_phrases("ok", &["I claim the world"]),
            Scenario::from_phrases("bad", &["I claim the world", "the check fails", "I claim the world"]),
            Scenario::from_phrases("ok again", &["I claim the world"]),
        ],
    )];

    let results = SuiteRunner::new(&registry)
        .with_concurrency(2)
        .run(&features, counting_factory(Arc::clone(&created)));

    assert_eq!(results[0].status, ScenarioStatus::Passed);
    assert_eq!(results[1].status, ScenarioStatus::Failed);
    assert_eq!(results[1].count(StepOutcome::Skipped), 1);
    assert_eq!(results[2].status, ScenarioStatus::Passed);
}

#[test]
fn factory_failure_errors_the_scenario() {
    let registry = claim_registry();
    let features = vec![Feature::new(
        "No driver",
        vec![Scenario::from_phrases("blocked", &["I claim the world", "I wait 1 ms"])],
    )];

    let results = SuiteRunner::new(&registry).run(&features, || Err(StepError::Other("no driver".into())));

    let result = &results[0];
    assert_eq!(result.status, ScenarioStatus::Errored);
    assert_eq!(result.error.as_deref(), Some("could not start scenario: no driver"));
    assert_eq!(result.count(StepOutcome::Skipped), 2);
}

/// Builds worlds normally except on call number `panic_on` (1-based).
fn panicking_factory(created: Arc<AtomicUsize>, panic_on: usize) -> impl Fn() -> Result<World, StepError> + Sync {
    move || {
        let id = created.fetch_add(1, Ordering::SeqCst);
        if id + 1 == panic_on {
            panic!("driver exploded");
        }
        Ok(World { id, claimed: false })
    }
}

#[test]
fn parallel_run_survives_a_panicking_factory() {
    let registry = claim_registry();
    let created = Arc::new(AtomicUsize::new(0));

    let results = SuiteRunner::new(&registry)
        .with_concurrency(2)
        .run(&sleepy_features(), panicking_factory(Arc::clone(&created), 4));

    assert_eq!(results.len(), 7);
    let errored: Vec<_> = results.iter().filter(|r| r.status == ScenarioStatus::Errored).collect();
    assert_eq!(errored.len(), 1, "{results:#?}");
    assert_eq!(errored[0].error.as_deref(), Some("scenario panicked: driver exploded"));
    assert_eq!(results.iter().filter(|r| r.passed()).count(), 6, "{results:#?}");

    let names: Vec<_> = results.iter().map(|r| r.scenario.as_str()).collect();
    assert_eq!(
        names,
        vec!["first 0", "first 1", "first 2", "first 3", "second 0", "second 1", "second 2"]
    );
}

#[test]
fn sequential_run_survives_a_panicking_factory() {
    let registry = claim_registry();
    let created = Arc::new(AtomicUsize::new(0));

    let results = SuiteRunner::new(&registry).run(&sleepy_features(), panicking_factory(Arc::clone(&created), 4));

    assert_eq!(created.load(Ordering::SeqCst), 7);
    assert_eq!(results[3].scenario, "first 3");
    assert_eq!(results[3].status, ScenarioStatus::Errored);
    assert_eq!(results[3].count(StepOutcome::Skipped), 2);
    for (i, result) in results.iter().enumerate().filter(|(i, _)| *i != 3) {
        assert!(result.passed(), "scenario {i}: {result:#?}");
    }
}

#[test]
fn scenario_timeout_applies_to_every_scenario() {
    let registry = claim_registry();
    let created = Arc::new(AtomicUsize::new(0));
    let features = vec![Feature::new(
        "Slow",
        vec![Scenario::from_phrases("slow", &["I wait 50 ms", "I claim the world"])],
    )];

    let results = SuiteRunner::new(&registry)
        .with_scenario_timeout(Some(Duration::from_millis(10)))
        .run(&features, counting_factory(Arc::clone(&created)));

    assert_eq!(results[0].status, ScenarioStatus::Errored);
    assert!(results[0].error.as_deref().unwrap_or("").contains("timeout"));
}

#[test]
fn trace_logger_writes_one_line_per_step() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");
    let trace = TraceLogger::new(&path);
    assert!(trace.is_enabled());

    let registry = claim_registry();
    let created = Arc::new(AtomicUsize::new(0));
    let features = vec![Feature::new(
        "Traced",
        vec![Scenario::from_phrases("traced", &["Given I claim the world", "Then the check fails", "And I claim the world"])],
    )];
    SuiteRunner::new(&registry)
        .with_trace(&trace)
        .run(&features, counting_factory(Arc::clone(&created)));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = content.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["feature"], "Traced");
    assert_eq!(lines[0]["step"], "Given I claim the world");
    assert_eq!(lines[1]["outcome"], "failed");
    assert_eq!(lines[2]["outcome"], "skipped");
    assert_eq!(lines[2]["step_index"], 2);
}

#[test]
fn disabled_trace_logger_writes_nothing() {
    let trace = TraceLogger::disabled();
    assert!(!trace.is_enabled());
}
