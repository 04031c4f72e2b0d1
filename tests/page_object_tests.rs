use page_scenarios::{
    browser::{
        error::BrowserError,
        mock::{MockBrowser, MockElement, MockPage},
    },
    locator::locator::LocatorSpec,
    page::{
        error::PageError,
        page_object::{PageObject, contains_ignore_case},
    },
};

use crate::common::fixtures::{form_page, session_on, session_with};

mod common;

fn form_object() -> PageObject {
    PageObject::builder("form")
        .url("https://app.test/")
        .field("user", LocatorSpec::id("user"))
        .field("go", LocatorSpec::css("button.go"))
        .field("banner", LocatorSpec::id("banner"))
        .field("status", LocatorSpec::id("status"))
        .field("ghost", LocatorSpec::id("ghost"))
        .build()
}

fn status_page(text: &str) -> MockPage {
    MockPage::new("Results")
        .with_element(MockElement::new(LocatorSpec::id("status")).with_text(text))
        .with_element(MockElement::new(LocatorSpec::id("footer")).with_text("About this page"))
}

// =========================================================================
// Declaration
// =========================================================================

#[test]
fn builder_declares_fields_without_touching_the_browser() {
    let page = form_object();
    assert_eq!(page.name(), "form");
    assert_eq!(page.base_url(), Some("https://app.test/"));
    assert_eq!(page.locator("user").unwrap(), &LocatorSpec::id("user"));
    assert_eq!(page.fields().count(), 5);
}

#[test]
fn unknown_field_is_reported_with_page_name() {
    let err = form_object().locator("nope").unwrap_err();
    match err {
        PageError::UnknownField { page, field } => {
            assert_eq!(page, "form");
            assert_eq!(field, "nope");
        }
        other => panic!("expected UnknownField, got {other:?}"),
    }
}

// =========================================================================
// open
// =========================================================================

#[test]
fn open_navigates_to_base_url() {
    let (mut session, handle) = session_with(MockBrowser::new().with_page("https://app.test/", form_page()));
    form_object().open(&mut session).unwrap();
    assert_eq!(handle.current_url().as_deref(), Some("https://app.test/"));
}

#[test]
fn open_without_base_url_fails() {
    let (mut session, _) = session_on(form_page());
    let page = PageObject::builder("results").build();
    assert!(matches!(page.open(&mut session), Err(PageError::MissingUrl { .. })));
}

#[test]
fn open_unreachable_url_is_navigation_error() {
    let (mut session, _) = session_with(MockBrowser::new());
    let err = form_object().open(&mut session).unwrap_err();
    assert!(matches!(err, PageError::Browser(BrowserError::Navigation { .. })), "got {err:?}");
}

#[test]
fn open_on_closed_session_is_navigation_error() {
    let (mut session, _) = session_on(form_page());
    session.quit().unwrap();
    let err = form_object().open(&mut session).unwrap_err();
    assert!(matches!(err, PageError::Browser(BrowserError::Navigation { .. })), "got {err:?}");
}

// =========================================================================
// Actions
// =========================================================================

#[test]
fn enter_text_overwrites_instead_of_appending() {
    let (mut session, handle) = session_on(form_page());
    let page = form_object();

    page.enter_text(&mut session, "user", "a").unwrap();
    page.enter_text(&mut session, "user", "b").unwrap();

    assert_eq!(handle.value_of(&LocatorSpec::id("user")).as_deref(), Some("b"));
}

#[test]
fn enter_text_into_missing_field_is_not_found() {
    let (mut session, _) = session_on(form_page());
    let err = form_object().enter_text(&mut session, "ghost", "x").unwrap_err();
    assert!(matches!(err, PageError::Browser(BrowserError::NotFound { .. })), "got {err:?}");
}

#[test]
fn click_on_disabled_element_is_not_interactable() {
    let (mut session, _) = session_on(form_page());
    let err = form_object().click(&mut session, "go").unwrap_err();
    assert!(matches!(err, PageError::Browser(BrowserError::NotInteractable { .. })), "got {err:?}");
}

#[test]
fn submit_hidden_element_is_not_interactable() {
    let (mut session, _) = session_on(form_page());
    let err = form_object().submit(&mut session, "banner").unwrap_err();
    assert!(matches!(err, PageError::Browser(BrowserError::NotInteractable { .. })), "got {err:?}");
}

#[test]
fn wait_for_visible_on_hidden_element_times_out() {
    let (mut session, _) = session_on(form_page());
    let err = form_object().wait_for_visible(&mut session, "banner").unwrap_err();
    assert!(matches!(err, PageError::Browser(BrowserError::Timeout { .. })), "got {err:?}");
}

// =========================================================================
// Queries and assertions
// =========================================================================

#[test]
fn contains_text_matches_whole_words_ignoring_case() {
    let page = form_object();

    let (mut session, _) = session_on(status_page("No Results"));
    assert!(!page.contains_text(&mut session, Some("status"), "result").unwrap());

    let (mut session, _) = session_on(status_page("Top Result"));
    assert!(page.contains_text(&mut session, Some("status"), "result").unwrap());
    assert!(page.contains_text(&mut session, Some("status"), "TOP result").unwrap());
}

#[test]
fn contains_text_falls_back_to_page_text_when_field_is_absent() {
    let (mut session, _) = session_on(status_page("Top Result"));
    let page = form_object();
    assert!(page.contains_text(&mut session, Some("ghost"), "about this page").unwrap());
    assert!(page.contains_text(&mut session, None, "footer").is_ok());
    assert!(!page.contains_text(&mut session, None, "missing words").unwrap());
}

#[test]
fn should_contain_text_reports_expected_and_actual() {
    let (mut session, _) = session_on(status_page("No Results"));
    let err = form_object().should_contain_text(&mut session, "status", "cats").unwrap_err();
    match err {
        PageError::Assertion(failure) => {
            assert_eq!(failure.expected, "cats");
            assert_eq!(failure.actual, "No Results");
            let shown = failure.to_string();
            assert!(shown.contains("form.status"));
            assert!(shown.contains("expected: \"cats\""));
            assert!(shown.contains("actual: \"No Results\""));
        }
        other => panic!("expected Assertion, got {other:?}"),
    }
}

#[test]
fn should_contain_text_passes_on_substring() {
    let (mut session, _) = session_on(status_page("Top Result for cats"));
    form_object().should_contain_text(&mut session, "status", "cats").unwrap();
}

#[test]
fn page_should_contain_checks_whole_page() {
    let (mut session, _) = session_on(status_page("Top Result"));
    let page = form_object();
    page.page_should_contain(&mut session, "about this page").unwrap();
    let err = page.page_should_contain(&mut session, "cats").unwrap_err();
    assert!(matches!(err, PageError::Assertion(_)));
}

#[test]
fn is_displayed_never_fails() {
    let (mut session, _) = session_on(form_page());
    let page = form_object();
    assert!(page.is_displayed(&mut session, "status"));
    assert!(!page.is_displayed(&mut session, "banner"));
    assert!(!page.is_displayed(&mut session, "ghost"));
    assert!(!page.is_displayed(&mut session, "undeclared"));
}

#[test]
fn text_of_and_count() {
    let (mut session, _) = session_on(form_page());
    let page = form_object();
    assert_eq!(page.text_of(&mut session, "status").unwrap(), "Top Result");
    assert_eq!(page.count(&mut session, "ghost").unwrap(), 0);
    assert_eq!(page.count(&mut session, "status").unwrap(), 1);
}

#[test]
fn whole_word_matching_rules() {
    assert!(contains_ignore_case("Search for cats", "cats"));
    assert!(contains_ignore_case("cats, dogs", "CATS"));
    assert!(!contains_ignore_case("bobcats", "cats"));
    assert!(contains_ignore_case("anything", ""));
}
