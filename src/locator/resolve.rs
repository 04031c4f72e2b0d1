use crate::browser::error::BrowserError;
use crate::browser::session::{ResolvedElement, Session};
use crate::locator::locator::LocatorSpec;
use crate::locator::wait::poll_until;

// ============================================================================
// Lazy resolution against the live session
// ============================================================================

/// Resolve `locator` to a single element, waiting for it to appear.
///
/// When several elements match, the first in document order is returned.
/// Fails with `NotFound` if nothing matched before the session's wait timeout.
pub fn resolve_one(session: &mut Session, locator: &LocatorSpec) -> Result<ResolvedElement, BrowserError> {
    let wait = *session.wait_options();
    let found = poll_until(&wait, || {
        Ok(session.find_all(locator)?.into_iter().next())
    })?;

    match found {
        Some(element) => {
            tracing::debug!(%locator, "resolved");
            Ok(element)
        }
        None => Err(BrowserError::NotFound {
            locator: locator.clone(),
            timeout_ms: wait.timeout_ms,
        }),
    }
}

/// Every element currently matching `locator`. Never waits.
pub fn resolve_all(session: &mut Session, locator: &LocatorSpec) -> Result<Vec<ResolvedElement>, BrowserError> {
    session.find_all(locator)
}

/// Wait until the element is present and rendered.
///
/// Fails with `Timeout`, whether the element never appeared or stayed hidden.
pub fn wait_for_visible(session: &mut Session, locator: &LocatorSpec) -> Result<ResolvedElement, BrowserError> {
    let wait = *session.wait_options();
    let found = poll_until(&wait, || {
        for element in session.find_all(locator)? {
            if session.is_displayed(&element)? {
                return Ok(Some(element));
            }
        }
        Ok(None)
    })?;

    found.ok_or_else(|| BrowserError::Timeout {
        what: format!("'{}' to be visible", locator),
        timeout_ms: wait.timeout_ms,
    })
}

/// Wait until the element is present, visible and enabled.
///
/// An element that never appears is `NotFound`; one that appears but never
/// becomes usable is `NotInteractable`.
pub fn wait_for_interactable(session: &mut Session, locator: &LocatorSpec) -> Result<ResolvedElement, BrowserError> {
    let wait = *session.wait_options();
    let mut seen = false;
    let found = poll_until(&wait, || {
        let candidates = session.find_all(locator)?;
        seen |= !candidates.is_empty();
        for element in candidates {
            if session.is_displayed(&element)? && session.is_enabled(&element)? {
                return Ok(Some(element));
            }
        }
        Ok(None)
    })?;

    match found {
        Some(element) => Ok(element),
        None if seen => Err(BrowserError::NotInteractable {
            locator: locator.clone(),
            timeout_ms: wait.timeout_ms,
        }),
        None => Err(BrowserError::NotFound {
            locator: locator.clone(),
            timeout_ms: wait.timeout_ms,
        }),
    }
}
