use thiserror::Error;

use crate::locator::locator::LocatorSpec;

/// Failures raised by the browser engine or while waiting on it.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Element never appeared within the wait timeout
    #[error("element '{locator}' not found after {timeout_ms}ms")]
    NotFound { locator: LocatorSpec, timeout_ms: u64 },

    /// Element is present but never became visible and enabled
    #[error("element '{locator}' not interactable after {timeout_ms}ms")]
    NotInteractable { locator: LocatorSpec, timeout_ms: u64 },

    /// Page failed to load
    #[error("navigation to '{url}' failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Generic wait exceeded
    #[error("timed out after {timeout_ms}ms waiting for {what}")]
    Timeout { what: String, timeout_ms: u64 },

    /// Element handle obtained before a later page load
    #[error("element '{locator}' is stale (resolved on page load {resolved_on}, current is {current})")]
    StaleElement {
        locator: LocatorSpec,
        resolved_on: u64,
        current: u64,
    },

    /// No live session to talk to
    #[error("browser session is not started")]
    SessionNotStarted,

    /// Session vanished mid-scenario (driver crash, disconnect)
    #[error("browser session lost: {0}")]
    SessionLost(String),

    /// Driver answered with an error we do not model more precisely
    #[error("{command} failed: {error}")]
    Protocol { command: String, error: String },

    /// Transport failure talking to the driver
    #[error("HTTP error talking to driver: {0}")]
    Http(#[from] reqwest::Error),

    /// Driver returned something we could not decode
    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl BrowserError {
    pub fn protocol(command: impl Into<String>, error: impl Into<String>) -> Self {
        BrowserError::Protocol {
            command: command.into(),
            error: error.into(),
        }
    }
}
