use crate::search::pages::{FIRST_RESULT, HOME_PAGE, RESULTS, RESULTS_PAGE, SEARCH_BOX};
use crate::steps::context::ScenarioContext;
use crate::steps::error::StepError;

/// Open the search engine's home page and wait for the search box.
pub fn open_homepage(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    let (home, session) = ctx.on_page(HOME_PAGE)?;
    home.open(session)?;
    home.wait_for_visible(session, SEARCH_BOX)?;
    Ok(())
}

/// Type `term` into the search box and submit it.
pub fn search_for(ctx: &mut ScenarioContext, term: &str) -> Result<(), StepError> {
    let (home, session) = ctx.on_page(HOME_PAGE)?;
    home.enter_text(session, SEARCH_BOX, term)?;
    home.submit(session, SEARCH_BOX)?;
    Ok(())
}

/// The results container must contain `expected`.
pub fn verify_results(ctx: &mut ScenarioContext, expected: &str) -> Result<(), StepError> {
    let (results, session) = ctx.on_page(RESULTS_PAGE)?;
    results.should_contain_text(session, RESULTS, expected)?;
    Ok(())
}

/// The rendered text of whatever page was acted on last must contain `expected`.
pub fn page_contains(ctx: &mut ScenarioContext, expected: &str) -> Result<(), StepError> {
    let name = ctx.current().unwrap_or(RESULTS_PAGE).to_string();
    let (page, session) = ctx.on_page(&name)?;
    page.page_should_contain(session, expected)?;
    Ok(())
}

/// Whether a first result is rendered. Never fails on a missing element.
pub fn has_results(ctx: &mut ScenarioContext) -> Result<bool, StepError> {
    let (results, session) = ctx.on_page(RESULTS_PAGE)?;
    Ok(results.is_displayed(session, FIRST_RESULT))
}

pub fn expect_some_result(ctx: &mut ScenarioContext) -> Result<(), StepError> {
    {
        let (results, session) = ctx.on_page(RESULTS_PAGE)?;
        results.wait_for_visible(session, RESULTS)?;
    }
    if has_results(ctx)? {
        Ok(())
    } else {
        Err(StepError::assertion("no search result is displayed", "at least one result", "none"))
    }
}
