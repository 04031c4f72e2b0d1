use thiserror::Error;

use crate::browser::error::BrowserError;
use crate::page::error::{AssertionFailure, PageError};

/// Scenario text did not fit the placeholder type it matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("argument {position} ('{value}') is not a valid {{{expected}}}")]
pub struct PlaceholderTypeError {
    /// 0-based placeholder position within the pattern
    pub position: usize,
    /// Placeholder name, e.g. `int`
    pub expected: String,
    pub value: String,
}

/// Step registration problems, reported before any scenario runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("step pattern '{pattern}' duplicates already registered '{existing}'")]
    DuplicatePattern { pattern: String, existing: String },

    #[error("invalid step pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Why a step did not pass.
///
/// Only [`StepError::Assertion`] fails a scenario; every other variant makes
/// it `Errored`.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Assertion(AssertionFailure),

    #[error(transparent)]
    Page(PageError),

    #[error(transparent)]
    PlaceholderType(#[from] PlaceholderTypeError),

    #[error("no step binding matches '{phrase}'")]
    Undefined { phrase: String },

    #[error("step panicked: {0}")]
    Panicked(String),

    #[error("scenario exceeded its {timeout_ms}ms timeout")]
    TimedOut { timeout_ms: u64 },

    #[error("{0}")]
    Other(String),
}

impl StepError {
    pub fn is_assertion(&self) -> bool {
        matches!(self, StepError::Assertion(_))
    }

    /// Build an assertion failure from a handler.
    pub fn assertion(message: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        StepError::Assertion(AssertionFailure::new(message, expected, actual))
    }
}

impl From<PageError> for StepError {
    fn from(e: PageError) -> Self {
        match e {
            PageError::Assertion(failure) => StepError::Assertion(failure),
            other => StepError::Page(other),
        }
    }
}

impl From<BrowserError> for StepError {
    fn from(e: BrowserError) -> Self {
        StepError::Page(PageError::Browser(e))
    }
}

impl From<AssertionFailure> for StepError {
    fn from(failure: AssertionFailure) -> Self {
        StepError::Assertion(failure)
    }
}
