use std::collections::BTreeMap;

use crate::browser::session::Session;
use crate::page::page_object::PageObject;
use crate::steps::error::StepError;

/// Per-scenario world: the scenario's session plus the page objects its
/// steps act on.
///
/// Page objects hold no session state; `on_page` lends both out together.
pub struct ScenarioContext {
    session: Session,
    pages: BTreeMap<String, PageObject>,
    current_page: Option<String>,
}

impl ScenarioContext {
    pub fn new(session: Session) -> Self {
        ScenarioContext {
            session,
            pages: BTreeMap::new(),
            current_page: None,
        }
    }

    /// Register a page object under its own name.
    pub fn with_page(mut self, page: PageObject) -> Self {
        self.pages.insert(page.name().to_string(), page);
        self
    }

    pub fn page(&self, name: &str) -> Result<&PageObject, StepError> {
        self.pages
            .get(name)
            .ok_or_else(|| StepError::Other(format!("no page object named '{}'", name)))
    }

    /// Borrow page `name` and the session, and make `name` the current page.
    pub fn on_page(&mut self, name: &str) -> Result<(&PageObject, &mut Session), StepError> {
        let page = self
            .pages
            .get(name)
            .ok_or_else(|| StepError::Other(format!("no page object named '{}'", name)))?;
        self.current_page = Some(name.to_string());
        Ok((page, &mut self.session))
    }

    /// Name of the page most recently acted on.
    pub fn current(&self) -> Option<&str> {
        self.current_page.as_deref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Close the browser session. Safe to call more than once.
    pub fn close(&mut self) -> Result<(), StepError> {
        self.session.quit().map_err(StepError::from)
    }
}
