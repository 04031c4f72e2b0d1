use std::fmt;

use serde::{Deserialize, Serialize};

use crate::browser::error::BrowserError;
use crate::locator::locator::LocatorSpec;

/// Opaque engine-side element reference (WebDriver element id, mock index, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef(pub String);

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Browser trait: the automation engine seen from page objects
// ============================================================================

/// Operations the framework needs from a browser automation engine.
///
/// Implementations perform one engine call per method and never wait;
/// waiting and retrying belong to [`crate::locator::wait::poll_until`].
pub trait Browser: Send {
    /// Load `url` in the current window.
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Every element matching `locator`, in document order. No match is `Ok(vec![])`.
    fn find_all(&mut self, locator: &LocatorSpec) -> Result<Vec<ElementRef>, BrowserError>;

    fn clear(&mut self, element: &ElementRef) -> Result<(), BrowserError>;

    fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), BrowserError>;

    fn click(&mut self, element: &ElementRef) -> Result<(), BrowserError>;

    /// Submit the form the element belongs to.
    fn submit(&mut self, element: &ElementRef) -> Result<(), BrowserError>;

    /// Rendered text of the element.
    fn text(&mut self, element: &ElementRef) -> Result<String, BrowserError>;

    fn is_displayed(&mut self, element: &ElementRef) -> Result<bool, BrowserError>;

    fn is_enabled(&mut self, element: &ElementRef) -> Result<bool, BrowserError>;

    /// Raw HTML of the current page.
    fn page_source(&mut self) -> Result<String, BrowserError>;

    /// Rendered text of the whole page.
    ///
    /// Defaults to the text of `<body>`, or the tag-stripped source when the
    /// page has no body element.
    fn page_text(&mut self) -> Result<String, BrowserError> {
        let bodies = self.find_all(&LocatorSpec::css("body"))?;
        match bodies.first() {
            Some(body) => self.text(body),
            None => Ok(strip_tags(&self.page_source()?)),
        }
    }

    fn current_url(&mut self) -> Result<String, BrowserError>;

    /// End the session. Calling it twice is not an error.
    fn quit(&mut self) -> Result<(), BrowserError>;
}

/// Drop markup from an HTML string, collapsing whitespace.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
