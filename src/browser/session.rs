use crate::browser::driver::{Browser, ElementRef};
use crate::browser::error::BrowserError;
use crate::locator::locator::LocatorSpec;
use crate::locator::wait::WaitOptions;

/// An element handle tied to the page load it was resolved in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedElement {
    pub element: ElementRef,
    pub locator: LocatorSpec,
    page_load: u64,
}

impl ResolvedElement {
    /// Page load counter value at resolution time.
    pub fn page_load(&self) -> u64 {
        self.page_load
    }
}

/// One browser session, owned by exactly one scenario.
///
/// Wraps the engine with the explicit-wait policy and a page-load counter.
/// Every action that can load a new document (`navigate`, `click`, `submit`)
/// advances the counter, and handles resolved before it are refused with
/// [`BrowserError::StaleElement`].
pub struct Session {
    browser: Box<dyn Browser>,
    wait: WaitOptions,
    page_load: u64,
    started: bool,
    last_url: Option<String>,
}

impl Session {
    pub fn new(browser: Box<dyn Browser>, wait: WaitOptions) -> Self {
        Session {
            browser,
            wait,
            page_load: 0,
            started: true,
            last_url: None,
        }
    }

    pub fn wait_options(&self) -> &WaitOptions {
        &self.wait
    }

    pub fn set_wait_options(&mut self, wait: WaitOptions) {
        self.wait = wait;
    }

    pub fn page_load(&self) -> u64 {
        self.page_load
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Last URL passed to `navigate` (cached, no browser call).
    pub fn last_url(&self) -> Option<&str> {
        self.last_url.as_deref()
    }

    fn ensure_started(&self) -> Result<(), BrowserError> {
        if self.started {
            Ok(())
        } else {
            Err(BrowserError::SessionNotStarted)
        }
    }

    fn ensure_fresh(&self, element: &ResolvedElement) -> Result<(), BrowserError> {
        if element.page_load == self.page_load {
            Ok(())
        } else {
            Err(BrowserError::StaleElement {
                locator: element.locator.clone(),
                resolved_on: element.page_load,
                current: self.page_load,
            })
        }
    }

    fn next_page_load(&mut self) {
        self.page_load += 1;
    }

    /// Navigate to a URL. Any failure is reported as a navigation error.
    pub fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        if !self.started {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: BrowserError::SessionNotStarted.to_string(),
            });
        }

        tracing::debug!(url, "navigate");
        let result = self.browser.navigate(url);
        // The old document is gone even when the new one failed to load.
        self.next_page_load();

        match result {
            Ok(()) => {
                self.last_url = Some(url.to_string());
                Ok(())
            }
            Err(e @ BrowserError::Navigation { .. }) => Err(e),
            Err(e) => Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Single, non-waiting lookup of every element matching `locator`.
    pub fn find_all(&mut self, locator: &LocatorSpec) -> Result<Vec<ResolvedElement>, BrowserError> {
        self.ensure_started()?;
        let page_load = self.page_load;
        let found = self.browser.find_all(locator)?;
        Ok(found
            .into_iter()
            .map(|element| ResolvedElement {
                element,
                locator: locator.clone(),
                page_load,
            })
            .collect())
    }

    pub fn clear(&mut self, element: &ResolvedElement) -> Result<(), BrowserError> {
        self.ensure_started()?;
        self.ensure_fresh(element)?;
        self.browser.clear(&element.element)
    }

    pub fn send_keys(&mut self, element: &ResolvedElement, text: &str) -> Result<(), BrowserError> {
        self.ensure_started()?;
        self.ensure_fresh(element)?;
        self.browser.send_keys(&element.element, text)
    }

    pub fn click(&mut self, element: &ResolvedElement) -> Result<(), BrowserError> {
        self.ensure_started()?;
        self.ensure_fresh(element)?;
        tracing::debug!(locator = %element.locator, "click");
        self.browser.click(&element.element)?;
        self.next_page_load();
        Ok(())
    }

    pub fn submit(&mut self, element: &ResolvedElement) -> Result<(), BrowserError> {
        self.ensure_started()?;
        self.ensure_fresh(element)?;
        tracing::debug!(locator = %element.locator, "submit");
        self.browser.submit(&element.element)?;
        self.next_page_load();
        Ok(())
    }

    pub fn text(&mut self, element: &ResolvedElement) -> Result<String, BrowserError> {
        self.ensure_started()?;
        self.ensure_fresh(element)?;
        self.browser.text(&element.element)
    }

    pub fn is_displayed(&mut self, element: &ResolvedElement) -> Result<bool, BrowserError> {
        self.ensure_started()?;
        self.ensure_fresh(element)?;
        self.browser.is_displayed(&element.element)
    }

    pub fn is_enabled(&mut self, element: &ResolvedElement) -> Result<bool, BrowserError> {
        self.ensure_started()?;
        self.ensure_fresh(element)?;
        self.browser.is_enabled(&element.element)
    }

    pub fn page_source(&mut self) -> Result<String, BrowserError> {
        self.ensure_started()?;
        self.browser.page_source()
    }

    pub fn page_text(&mut self) -> Result<String, BrowserError> {
        self.ensure_started()?;
        self.browser.page_text()
    }

    pub fn current_url(&mut self) -> Result<String, BrowserError> {
        self.ensure_started()?;
        self.browser.current_url()
    }

    /// End the session. Later calls fail with `SessionNotStarted`.
    pub fn quit(&mut self) -> Result<(), BrowserError> {
        if !self.started {
            return Ok(());
        }
        self.started = false;
        tracing::debug!("quit session");
        self.browser.quit()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
