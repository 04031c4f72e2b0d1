#![allow(dead_code)]

use page_scenarios::{
    browser::{
        mock::{MockBrowser, MockElement, MockHandle, MockPage},
        session::Session,
    },
    locator::{locator::LocatorSpec, wait::WaitOptions},
    search::{definitions::search_context, mock_site::mock_search_engine},
    steps::context::ScenarioContext,
};

pub const BASE_URL: &str = "https://search.test";

/// Short waits so negative tests finish quickly.
pub fn fast_wait() -> WaitOptions {
    WaitOptions::new(150, 10)
}

/// A session over `browser` plus a handle to observe it.
pub fn session_with(browser: MockBrowser) -> (Session, MockHandle) {
    let handle = browser.handle();
    (Session::new(Box::new(browser), fast_wait()), handle)
}

/// A session already showing `page` at `https://app.test/`.
pub fn session_on(page: MockPage) -> (Session, MockHandle) {
    let (mut session, handle) = session_with(MockBrowser::new().with_page("https://app.test/", page));
    session.navigate("https://app.test/").unwrap();
    (session, handle)
}

/// Scenario world wired to the scripted search engine.
pub fn mock_search_context() -> (ScenarioContext, MockHandle) {
    let (session, handle) = session_with(mock_search_engine(BASE_URL));
    (search_context(session, BASE_URL), handle)
}

/// A login-style page: a text input, a disabled button, a hidden banner.
pub fn form_page() -> MockPage {
    MockPage::new("Form")
        .with_element(MockElement::new(LocatorSpec::id("user")).with_value("prefilled"))
        .with_element(MockElement::new(LocatorSpec::css("button.go")).disabled())
        .with_element(MockElement::new(LocatorSpec::id("banner")).with_text("Welcome back").hidden())
        .with_element(MockElement::new(LocatorSpec::id("status")).with_text("Top Result"))
}
