use crate::{
    feature::feature_model::Scenario,
    steps::{outcome::ScenarioResult, registry::StepRegistry, runner::ScenarioRunner},
};

pub mod browser;
pub mod cli;
pub mod feature;
pub mod locator;
pub mod page;
pub mod report;
pub mod search;
pub mod steps;
pub mod suite;
pub mod trace;

/// Run an ad-hoc scenario of plain phrases against `world`.
///
/// Phrases may carry a Given/When/Then keyword; it is ignored for matching.
pub fn run_scenario<W>(registry: &StepRegistry<W>, world: &mut W, name: &str, phrases: &[&str]) -> ScenarioResult {
    let scenario = Scenario::from_phrases(name, phrases);
    ScenarioRunner::new(registry).run(world, "", &scenario)
}
