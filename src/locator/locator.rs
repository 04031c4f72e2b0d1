use std::fmt;

use serde::{Deserialize, Serialize};

/// How a locator finds its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// `id` attribute
    Id,
    /// `name` attribute
    Name,
    /// CSS selector
    Css,
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Id => "id",
            Strategy::Name => "name",
            Strategy::Css => "css",
            Strategy::XPath => "xpath",
        }
    }
}

/// Declarative description of how to find one element on a page.
///
/// Declaring a locator never touches the browser; it is resolved lazily by
/// [`crate::locator::resolve::resolve_one`] against the live session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocatorSpec {
    pub strategy: Strategy,
    pub value: String,
}

impl LocatorSpec {
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        LocatorSpec {
            strategy,
            value: value.into(),
        }
    }

    pub fn id(value: impl Into<String>) -> Self {
        Self::new(Strategy::Id, value)
    }

    pub fn name(value: impl Into<String>) -> Self {
        Self::new(Strategy::Name, value)
    }

    pub fn css(value: impl Into<String>) -> Self {
        Self::new(Strategy::Css, value)
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, value)
    }

    /// Express this locator as a CSS selector, if the strategy allows it.
    ///
    /// `id` and `name` become attribute selectors so that values containing
    /// characters which are not valid in `#id` shorthand still work.
    pub fn to_css(&self) -> Option<String> {
        match self.strategy {
            Strategy::Id => Some(format!("[id=\"{}\"]", escape_attr(&self.value))),
            Strategy::Name => Some(format!("[name=\"{}\"]", escape_attr(&self.value))),
            Strategy::Css => Some(self.value.clone()),
            Strategy::XPath => None,
        }
    }
}

impl fmt::Display for LocatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.as_str(), self.value)
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
