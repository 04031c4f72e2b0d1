use std::fmt;

use thiserror::Error;

use crate::browser::error::BrowserError;

/// An expectation about the page that did not hold.
///
/// This is the only error that marks a scenario `Failed`; everything else
/// marks it `Errored`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        writeln!(f, "  expected: {:?}", self.expected)?;
        write!(f, "    actual: {:?}", truncate(&self.actual, 200))
    }
}

impl std::error::Error for AssertionFailure {}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

/// Failures of a page-object behavior method.
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// Field name not declared on the page
    #[error("page '{page}' has no field '{field}'")]
    UnknownField { page: String, field: String },

    /// `open()` on a page without a base URL
    #[error("page '{page}' has no base URL to open")]
    MissingUrl { page: String },

    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
}
