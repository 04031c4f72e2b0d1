use crate::browser::session::Session;
use crate::search::pages::{search_home_page, search_results_page};
use crate::search::steps;
use crate::steps::context::ScenarioContext;
use crate::steps::error::RegistryError;
use crate::steps::registry::StepRegistry;

/// Bind the search phrases to the search steps.
pub fn register_search_steps(registry: &mut StepRegistry<ScenarioContext>) -> Result<(), RegistryError> {
    registry
        .register("I am on the Google homepage", |ctx, _| steps::open_homepage(ctx))?
        .register("I search for {string}", |ctx, args| steps::search_for(ctx, args.str(0)?))?
        .register("I should see search results containing {string}", |ctx, args| {
            steps::verify_results(ctx, args.str(0)?)
        })?
        .register("I should see at least one result", |ctx, _| steps::expect_some_result(ctx))?
        .register("the page should contain {string}", |ctx, args| {
            steps::page_contains(ctx, args.str(0)?)
        })?;

    // Short forms
    registry
        .register("open homepage", |ctx, _| steps::open_homepage(ctx))?
        .register("search for {string}", |ctx, args| steps::search_for(ctx, args.str(0)?))?
        .register("expect results containing {string}", |ctx, args| {
            steps::verify_results(ctx, args.str(0)?)
        })?;

    registry.after_scenario(|ctx| ctx.close());
    Ok(())
}

/// A registry holding only the search steps.
pub fn search_registry() -> Result<StepRegistry<ScenarioContext>, RegistryError> {
    let mut registry = StepRegistry::new();
    register_search_steps(&mut registry)?;
    Ok(registry)
}

/// Scenario world with the search pages wired to `session`.
pub fn search_context(session: Session, base_url: &str) -> ScenarioContext {
    ScenarioContext::new(session)
        .with_page(search_home_page(base_url))
        .with_page(search_results_page())
}
