use crate::browser::mock::{MockBrowser, MockElement, MockPage};
use crate::locator::locator::LocatorSpec;

/// A scripted search engine served at `base_url`.
///
/// Submitting the search box loads `{base_url}/search?q=...`, whose results
/// echo the query. An empty query yields a "No Results" page.
pub fn mock_search_engine(base_url: &str) -> MockBrowser {
    let base = base_url.trim_end_matches('/');

    let home = MockPage::new("Search")
        .with_element(
            MockElement::new(LocatorSpec::name("q"))
                .also_matching(LocatorSpec::css("textarea[name='q']"))
                .submits_to(&format!("{}/search?q={{value}}", base)),
        )
        .with_element(
            MockElement::new(LocatorSpec::name("btnK"))
                .also_matching(LocatorSpec::css("input[value='Google Search']"))
                .with_value("Google Search"),
        );

    MockBrowser::new()
        .with_page(base_url, home.clone())
        .with_page(&format!("{}/", base), home)
        .with_route(&format!("{}/search?q=", base), results_page)
}

fn results_page(url: &str) -> MockPage {
    let query = url
        .split_once("?q=")
        .map(|(_, q)| q.replace('+', " "))
        .unwrap_or_default();

    let page = MockPage::new(&format!("{} - Search", query));
    if query.trim().is_empty() {
        return page.with_element(MockElement::new(LocatorSpec::id("search")).with_text("No Results"));
    }

    page.with_element(
        MockElement::new(LocatorSpec::id("search"))
            .with_text(&format!("Top Result for {}\n{} - Encyclopedia\nMore about {}", query, query, query)),
    )
    .with_element(MockElement::new(LocatorSpec::css("#search .g")).with_text(&format!("{} - Encyclopedia", query)))
}
