use std::collections::BTreeMap;

use crate::browser::error::BrowserError;
use crate::browser::session::Session;
use crate::locator::locator::LocatorSpec;
use crate::locator::resolve::{resolve_one, wait_for_interactable, wait_for_visible};
use crate::page::error::{AssertionFailure, PageError};

/// A UI page: a name, an optional URL and named element locators.
///
/// Page objects hold no browser state. Every behavior method takes the
/// scenario's [`Session`] and resolves its elements afresh, so a handle from
/// an earlier page load is never reused.
///
/// ```ignore
/// let home = PageObject::builder("search_home")
///     .url("https://www.google.com")
///     .field("search_box", LocatorSpec::name("q"))
///     .build();
///
/// home.open(&mut session)?;
/// home.enter_text(&mut session, "search_box", "cats")?;
/// home.submit(&mut session, "search_box")?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PageObject {
    name: String,
    base_url: Option<String>,
    fields: BTreeMap<String, LocatorSpec>,
}

/// Builder for [`PageObject`].
#[derive(Debug, Clone)]
pub struct PageObjectBuilder {
    name: String,
    base_url: Option<String>,
    fields: BTreeMap<String, LocatorSpec>,
}

impl PageObjectBuilder {
    pub fn url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, locator: LocatorSpec) -> Self {
        self.fields.insert(name.into(), locator);
        self
    }

    pub fn build(self) -> PageObject {
        PageObject {
            name: self.name,
            base_url: self.base_url,
            fields: self.fields,
        }
    }
}

impl PageObject {
    pub fn builder(name: impl Into<String>) -> PageObjectBuilder {
        PageObjectBuilder {
            name: name.into(),
            base_url: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &LocatorSpec)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Locator declared for `field`.
    pub fn locator(&self, field: &str) -> Result<&LocatorSpec, PageError> {
        self.fields.get(field).ok_or_else(|| PageError::UnknownField {
            page: self.name.clone(),
            field: field.to_string(),
        })
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Navigate the session to this page's base URL.
    pub fn open(&self, session: &mut Session) -> Result<(), PageError> {
        let url = self.base_url.as_deref().ok_or_else(|| PageError::MissingUrl {
            page: self.name.clone(),
        })?;
        tracing::info!(page = %self.name, url, "open page");
        session.navigate(url)?;
        Ok(())
    }

    /// Clear the field and type `text` into it. Calling twice overwrites.
    pub fn enter_text(&self, session: &mut Session, field: &str, text: &str) -> Result<(), PageError> {
        let locator = self.locator(field)?;
        let element = resolve_one(session, locator)?;
        session.clear(&element)?;
        session.send_keys(&element, text)?;
        tracing::debug!(page = %self.name, field, text, "entered text");
        Ok(())
    }

    /// Submit the form containing `field` once it is interactable.
    pub fn submit(&self, session: &mut Session, field: &str) -> Result<(), PageError> {
        let locator = self.locator(field)?;
        let element = wait_for_interactable(session, locator)?;
        session.submit(&element)?;
        Ok(())
    }

    /// Click `field` once it is interactable.
    pub fn click(&self, session: &mut Session, field: &str) -> Result<(), PageError> {
        let locator = self.locator(field)?;
        let element = wait_for_interactable(session, locator)?;
        session.click(&element)?;
        Ok(())
    }

    /// Block until `field` is present and rendered.
    pub fn wait_for_visible(&self, session: &mut Session, field: &str) -> Result<(), PageError> {
        let locator = self.locator(field)?;
        wait_for_visible(session, locator)?;
        Ok(())
    }

    // ========================================================================
    // Queries and assertions
    // ========================================================================

    /// Rendered text of `field`.
    pub fn text_of(&self, session: &mut Session, field: &str) -> Result<String, PageError> {
        let locator = self.locator(field)?;
        let element = resolve_one(session, locator)?;
        Ok(session.text(&element)?)
    }

    /// Whether `field`'s text contains `expected` as whole words, ignoring case.
    ///
    /// With no field, or when the field never appears, the whole rendered
    /// page text is searched instead.
    pub fn contains_text(&self, session: &mut Session, field: Option<&str>, expected: &str) -> Result<bool, PageError> {
        let haystack = match field {
            Some(field) => {
                let locator = self.locator(field)?;
                match resolve_one(session, locator) {
                    Ok(element) => session.text(&element)?,
                    Err(BrowserError::NotFound { .. }) => {
                        tracing::debug!(page = %self.name, field, "field absent, searching page text");
                        session.page_text()?
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            None => session.page_text()?,
        };
        Ok(contains_ignore_case(&haystack, expected))
    }

    /// Wait for `field` to be visible, then require its text to contain `expected`.
    pub fn should_contain_text(&self, session: &mut Session, field: &str, expected: &str) -> Result<(), PageError> {
        let locator = self.locator(field)?;
        let element = wait_for_visible(session, locator)?;
        let actual = session.text(&element)?;
        if actual.contains(expected) {
            Ok(())
        } else {
            Err(AssertionFailure::new(
                format!("{}.{} does not contain the expected text", self.name, field),
                expected,
                actual,
            )
            .into())
        }
    }

    /// Require the full rendered page text to contain `expected` as whole words, ignoring case.
    pub fn page_should_contain(&self, session: &mut Session, expected: &str) -> Result<(), PageError> {
        let actual = session.page_text()?;
        if contains_ignore_case(&actual, expected) {
            Ok(())
        } else {
            Err(AssertionFailure::new(
                format!("page '{}' does not contain the expected text", self.name),
                expected,
                actual,
            )
            .into())
        }
    }

    /// Whether `field` is currently rendered. Never waits and never fails.
    pub fn is_displayed(&self, session: &mut Session, field: &str) -> bool {
        let Ok(locator) = self.locator(field) else {
            return false;
        };
        let first = match session.find_all(locator) {
            Ok(found) => found.into_iter().next(),
            Err(_) => None,
        };
        first
            .map(|element| session.is_displayed(&element).unwrap_or(false))
            .unwrap_or(false)
    }

    /// Number of elements currently matching `field`. Never waits.
    pub fn count(&self, session: &mut Session, field: &str) -> Result<usize, PageError> {
        let locator = self.locator(field)?;
        Ok(session.find_all(locator)?.len())
    }
}

/// Whether `needle` occurs in `haystack` as whole words, ignoring case.
///
/// `"Top Result"` contains `"result"`; `"No Results"` does not.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let haystack = haystack.to_lowercase();
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    haystack.match_indices(&needle).any(|(start, found)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + found.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
