use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::browser::driver::{Browser, ElementRef};
use crate::browser::error::BrowserError;
use crate::locator::locator::LocatorSpec;

// ============================================================================
// Scripted page model
// ============================================================================

/// One element of a scripted page.
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Locators that find this element
    pub locators: Vec<LocatorSpec>,
    pub text: String,
    /// Current input value (inputs only)
    pub value: String,
    pub displayed: bool,
    pub enabled: bool,
    /// Number of lookups after page load before the element exists
    pub appears_after: u32,
    /// URL loaded on submit; `{value}` is replaced with the element's value
    pub submit_to: Option<String>,
    /// URL loaded on click
    pub click_to: Option<String>,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            locators: Vec::new(),
            text: String::new(),
            value: String::new(),
            displayed: true,
            enabled: true,
            appears_after: 0,
            submit_to: None,
            click_to: None,
        }
    }
}

impl MockElement {
    pub fn new(locator: LocatorSpec) -> Self {
        Self {
            locators: vec![locator],
            ..Self::default()
        }
    }

    pub fn also_matching(mut self, locator: LocatorSpec) -> Self {
        self.locators.push(locator);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn appears_after(mut self, lookups: u32) -> Self {
        self.appears_after = lookups;
        self
    }

    pub fn submits_to(mut self, url_template: &str) -> Self {
        self.submit_to = Some(url_template.to_string());
        self
    }

    pub fn clicks_to(mut self, url: &str) -> Self {
        self.click_to = Some(url.to_string());
        self
    }

    fn label(&self) -> String {
        self.locators
            .first()
            .map(|l| l.to_string())
            .unwrap_or_else(|| "<unlocatable>".into())
    }

    fn matches(&self, locator: &LocatorSpec) -> bool {
        self.locators.iter().any(|l| l == locator)
    }
}

/// A scripted document.
#[derive(Debug, Clone, Default)]
pub struct MockPage {
    pub title: String,
    pub elements: Vec<MockElement>,
}

impl MockPage {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: MockElement) -> Self {
        self.elements.push(element);
        self
    }
}

type RouteFn = Box<dyn Fn(&str) -> MockPage + Send>;

// ============================================================================
// Shared state and test handle
// ============================================================================

#[derive(Debug, Default)]
struct LoadedPage {
    url: String,
    page: MockPage,
    lookups: u32,
}

#[derive(Debug, Default)]
struct MockState {
    loaded: Option<LoadedPage>,
    load_count: u64,
    actions: Vec<String>,
}

/// Observe and perturb a `MockBrowser` after it has been moved into a session.
#[derive(Clone)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
    disconnected: Arc<AtomicBool>,
}

impl MockHandle {
    /// Simulate the driver going away; every later call fails with `SessionLost`.
    pub fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }

    /// Actions performed so far, e.g. `navigate https://...`, `keys name=q cats`.
    pub fn actions(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.actions.clone())
            .unwrap_or_default()
    }

    /// Current value of the first element on the loaded page matching `locator`.
    pub fn value_of(&self, locator: &LocatorSpec) -> Option<String> {
        let state = self.state.lock().ok()?;
        let loaded = state.loaded.as_ref()?;
        loaded
            .page
            .elements
            .iter()
            .find(|e| e.matches(locator))
            .map(|e| e.value.clone())
    }

    pub fn current_url(&self) -> Option<String> {
        let state = self.state.lock().ok()?;
        state.loaded.as_ref().map(|l| l.url.clone())
    }
}

// ============================================================================
// MockBrowser
// ============================================================================

/// In-memory browser serving scripted pages.
///
/// Pages are looked up by exact URL first, then by the longest registered
/// route prefix. Unknown URLs fail navigation as unreachable.
pub struct MockBrowser {
    pages: HashMap<String, MockPage>,
    routes: Vec<(String, RouteFn)>,
    state: Arc<Mutex<MockState>>,
    disconnected: Arc<AtomicBool>,
    quit: bool,
}

impl Default for MockBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBrowser {
    pub fn new() -> Self {
        MockBrowser {
            pages: HashMap::new(),
            routes: Vec::new(),
            state: Arc::new(Mutex::new(MockState::default())),
            disconnected: Arc::new(AtomicBool::new(false)),
            quit: false,
        }
    }

    pub fn with_page(mut self, url: &str, page: MockPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    /// Serve every URL starting with `prefix` from `build`.
    pub fn with_route<F>(mut self, prefix: &str, build: F) -> Self
    where
        F: Fn(&str) -> MockPage + Send + 'static,
    {
        self.routes.push((prefix.to_string(), Box::new(build)));
        self
    }

    pub fn handle(&self) -> MockHandle {
        MockHandle {
            state: Arc::clone(&self.state),
            disconnected: Arc::clone(&self.disconnected),
        }
    }

    fn lookup(&self, url: &str) -> Option<MockPage> {
        if let Some(page) = self.pages.get(url) {
            return Some(page.clone());
        }
        self.routes
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, build)| build(url))
    }

    fn state(&self) -> Result<std::sync::MutexGuard<'_, MockState>, BrowserError> {
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(BrowserError::SessionLost("mock driver disconnected".into()));
        }
        if self.quit {
            return Err(BrowserError::SessionNotStarted);
        }
        self.state
            .lock()
            .map_err(|_| BrowserError::SessionLost("mock state poisoned".into()))
    }

    fn load(&mut self, url: &str) -> Result<(), BrowserError> {
        let page = self.lookup(url).ok_or_else(|| BrowserError::Navigation {
            url: url.to_string(),
            reason: "host unreachable".into(),
        })?;

        let mut state = self.state()?;
        state.load_count += 1;
        state.loaded = Some(LoadedPage {
            url: url.to_string(),
            page,
            lookups: 0,
        });
        Ok(())
    }

    /// Run `f` on the referenced element of the loaded page.
    fn with_element<T>(
        &self,
        element: &ElementRef,
        f: impl FnOnce(&mut MockElement, &mut Vec<String>) -> Result<T, BrowserError>,
    ) -> Result<T, BrowserError> {
        let mut state = self.state()?;
        let (load, index) = parse_ref(element)
            .ok_or_else(|| BrowserError::protocol("element", format!("malformed element id {}", element)))?;
        if load != state.load_count {
            return Err(BrowserError::protocol("element", "stale element reference"));
        }

        let MockState { loaded, actions, .. } = &mut *state;
        let loaded = loaded.as_mut().ok_or(BrowserError::SessionNotStarted)?;
        let target = loaded
            .page
            .elements
            .get_mut(index)
            .ok_or_else(|| BrowserError::protocol("element", format!("no element {}", element)))?;
        f(target, actions)
    }

    fn interactable(element: &MockElement) -> Result<(), BrowserError> {
        if element.displayed && element.enabled {
            Ok(())
        } else {
            Err(BrowserError::NotInteractable {
                locator: element.locators.first().cloned().unwrap_or_else(|| LocatorSpec::css("*")),
                timeout_ms: 0,
            })
        }
    }
}

fn element_ref(load: u64, index: usize) -> ElementRef {
    ElementRef(format!("p{}-e{}", load, index))
}

fn parse_ref(element: &ElementRef) -> Option<(u64, usize)> {
    let (load, index) = element.0.strip_prefix('p')?.split_once("-e")?;
    Some((load.parse().ok()?, index.parse().ok()?))
}

fn fill_template(template: &str, value: &str) -> String {
    let encoded: String = value
        .chars()
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();
    template.replace("{value}", &encoded)
}

impl Browser for MockBrowser {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.state()?.actions.push(format!("navigate {}", url));
        self.load(url)
    }

    fn find_all(&mut self, locator: &LocatorSpec) -> Result<Vec<ElementRef>, BrowserError> {
        let mut state = self.state()?;
        let load = state.load_count;
        let Some(loaded) = state.loaded.as_mut() else {
            return Ok(Vec::new());
        };
        loaded.lookups += 1;
        let lookups = loaded.lookups;

        Ok(loaded
            .page
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.matches(locator) && e.appears_after < lookups)
            .map(|(i, _)| element_ref(load, i))
            .collect())
    }

    fn clear(&mut self, element: &ElementRef) -> Result<(), BrowserError> {
        self.with_element(element, |e, actions| {
            Self::interactable(e)?;
            e.value.clear();
            actions.push(format!("clear {}", e.label()));
            Ok(())
        })
    }

    fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), BrowserError> {
        self.with_element(element, |e, actions| {
            Self::interactable(e)?;
            e.value.push_str(text);
            actions.push(format!("keys {} {}", e.label(), text));
            Ok(())
        })
    }

    fn click(&mut self, element: &ElementRef) -> Result<(), BrowserError> {
        let target = self.with_element(element, |e, actions| {
            Self::interactable(e)?;
            actions.push(format!("click {}", e.label()));
            Ok(e.click_to.clone())
        })?;
        match target {
            Some(url) => self.load(&url),
            None => Ok(()),
        }
    }

    fn submit(&mut self, element: &ElementRef) -> Result<(), BrowserError> {
        let target = self.with_element(element, |e, actions| {
            actions.push(format!("submit {}", e.label()));
            Ok(e.submit_to.as_deref().map(|t| fill_template(t, &e.value)))
        })?;
        match target {
            Some(url) => self.load(&url),
            None => Ok(()),
        }
    }

    fn text(&mut self, element: &ElementRef) -> Result<String, BrowserError> {
        self.with_element(element, |e, _| Ok(e.text.clone()))
    }

    fn is_displayed(&mut self, element: &ElementRef) -> Result<bool, BrowserError> {
        self.with_element(element, |e, _| Ok(e.displayed))
    }

    fn is_enabled(&mut self, element: &ElementRef) -> Result<bool, BrowserError> {
        self.with_element(element, |e, _| Ok(e.enabled))
    }

    fn page_source(&mut self) -> Result<String, BrowserError> {
        let state = self.state()?;
        let Some(loaded) = state.loaded.as_ref() else {
            return Ok(String::new());
        };
        let body: String = loaded
            .page
            .elements
            .iter()
            .map(|e| format!("<div>{}</div>", e.text))
            .collect();
        Ok(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            loaded.page.title, body
        ))
    }

    fn page_text(&mut self) -> Result<String, BrowserError> {
        let state = self.state()?;
        Ok(state
            .loaded
            .as_ref()
            .map(|loaded| {
                loaded
                    .page
                    .elements
                    .iter()
                    .filter(|e| e.displayed && !e.text.is_empty())
                    .map(|e| e.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default())
    }

    fn current_url(&mut self) -> Result<String, BrowserError> {
        let state = self.state()?;
        Ok(state.loaded.as_ref().map(|l| l.url.clone()).unwrap_or_else(|| "about:blank".into()))
    }

    fn quit(&mut self) -> Result<(), BrowserError> {
        if let Ok(mut state) = self.state.lock() {
            state.actions.push("quit".into());
        }
        self.quit = true;
        Ok(())
    }
}
