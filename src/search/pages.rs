use crate::locator::locator::LocatorSpec;
use crate::page::page_object::PageObject;

pub const DEFAULT_BASE_URL: &str = "https://www.google.com";

pub const HOME_PAGE: &str = "search home";
pub const RESULTS_PAGE: &str = "search results";

// Home page fields
pub const SEARCH_BOX: &str = "search_box";
pub const SEARCH_BUTTON: &str = "search_button";
pub const SEARCH_BUTTON_ALT: &str = "search_button_alt";

// Results page fields
pub const RESULTS: &str = "results";
pub const FIRST_RESULT: &str = "first_result";

/// The search engine's landing page.
pub fn search_home_page(base_url: &str) -> PageObject {
    PageObject::builder(HOME_PAGE)
        .url(base_url)
        .field(SEARCH_BOX, LocatorSpec::name("q"))
        .field(SEARCH_BUTTON, LocatorSpec::name("btnK"))
        .field(SEARCH_BUTTON_ALT, LocatorSpec::css("input[value='Google Search']"))
        .build()
}

/// The results page reached by submitting a query. Has no URL of its own.
pub fn search_results_page() -> PageObject {
    PageObject::builder(RESULTS_PAGE)
        .field(RESULTS, LocatorSpec::id("search"))
        .field(FIRST_RESULT, LocatorSpec::css("#search .g"))
        .build()
}
