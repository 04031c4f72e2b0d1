use std::collections::HashMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::browser::driver::{Browser, ElementRef};
use crate::browser::error::BrowserError;
use crate::locator::locator::LocatorSpec;

/// W3C key under which element references travel on the wire.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// The Enter key in WebDriver's private-use key range.
const ENTER_KEY: &str = "\u{E007}";

// ============================================================================
// Connection settings
// ============================================================================

/// Where the WebDriver server lives and which browser to ask it for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebDriverConfig {
    /// Base URL of chromedriver / geckodriver / Selenium Grid
    #[serde(default = "default_url")]
    pub url: String,

    /// Browser name capability: chrome, firefox, MicrosoftEdge
    #[serde(default = "default_browser")]
    pub browser: String,

    #[serde(default = "default_true")]
    pub headless: bool,

    /// Extra command-line arguments for the browser
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            browser: default_browser(),
            headless: true,
            args: Vec::new(),
        }
    }
}

fn default_url() -> String { "http://localhost:4444".to_string() }
fn default_browser() -> String { "chrome".to_string() }
fn default_true() -> bool { true }

impl WebDriverConfig {
    /// Capabilities payload for `POST /session`.
    pub fn capabilities(&self) -> Value {
        let mut args = self.args.clone();
        let mut always_match = json!({ "browserName": self.browser });

        match self.browser.as_str() {
            "firefox" => {
                if self.headless {
                    args.push("-headless".into());
                }
                always_match["moz:firefoxOptions"] = json!({ "args": args });
            }
            "MicrosoftEdge" | "edge" => {
                if self.headless {
                    args.push("--headless=new".into());
                }
                always_match["browserName"] = json!("MicrosoftEdge");
                always_match["ms:edgeOptions"] = json!({ "args": args });
            }
            _ => {
                if self.headless {
                    args.push("--headless=new".into());
                }
                always_match["goog:chromeOptions"] = json!({ "args": args });
            }
        }

        json!({ "capabilities": { "alwaysMatch": always_match } })
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// `POST /session/{id}/elements` body.
#[derive(Debug, Serialize)]
pub struct FindRequest {
    pub using: &'static str,
    pub value: String,
}

impl FindRequest {
    pub fn for_locator(locator: &LocatorSpec) -> Self {
        match locator.to_css() {
            Some(css) => FindRequest {
                using: "css selector",
                value: css,
            },
            None => FindRequest {
                using: "xpath",
                value: locator.value.clone(),
            },
        }
    }
}

/// Every WebDriver response wraps its payload in `value`.
#[derive(Debug, Deserialize)]
pub struct WireResponse {
    #[serde(default)]
    pub value: Value,
}

/// Shape of `value` when a command failed.
#[derive(Debug, Deserialize)]
pub struct WireError {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

/// Translate a W3C error body into a `BrowserError`.
///
/// Element-level codes keep their W3C name as the message prefix so callers
/// can refine them once they know which locator was involved.
pub fn map_wire_error(command: &str, error: WireError) -> BrowserError {
    match error.error.as_str() {
        "invalid session id" => BrowserError::SessionNotStarted,
        "no such window" => BrowserError::SessionLost(error.message),
        _ => BrowserError::Protocol {
            command: command.to_string(),
            error: format!("{}: {}", error.error, error.message),
        },
    }
}

// ============================================================================
// Client
// ============================================================================

/// A W3C WebDriver session driven over blocking HTTP.
pub struct WebDriverBrowser {
    client: reqwest::blocking::Client,
    base_url: String,
    session_id: Option<String>,
    /// Locator each element id was found with, for error reporting.
    known: HashMap<String, LocatorSpec>,
}

impl WebDriverBrowser {
    /// Open a new browser session on the WebDriver server.
    pub fn connect(config: &WebDriverConfig) -> Result<Self, BrowserError> {
        let client = reqwest::blocking::Client::builder().build()?;
        let mut browser = WebDriverBrowser {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            session_id: None,
            known: HashMap::new(),
        };

        let value = browser.send(Method::POST, "/session", Some(config.capabilities()), "new session")?;
        let session_id = value["sessionId"]
            .as_str()
            .ok_or_else(|| BrowserError::protocol("new session", "no sessionId in response"))?
            .to_string();

        tracing::info!(session_id = %session_id, driver = %browser.base_url, "webdriver session started");
        browser.session_id = Some(session_id);
        Ok(browser)
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn session_path(&self, suffix: &str) -> Result<String, BrowserError> {
        let id = self.session_id.as_deref().ok_or(BrowserError::SessionNotStarted)?;
        Ok(format!("/session/{}{}", id, suffix))
    }

    fn element_path(&self, element: &ElementRef, suffix: &str) -> Result<String, BrowserError> {
        self.session_path(&format!("/element/{}{}", element.0, suffix))
    }

    /// Send a command and unwrap the `value` payload, mapping W3C errors.
    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        command: &str,
    ) -> Result<Value, BrowserError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::trace!(%method, %url, "webdriver command");

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;

        let wire: WireResponse = serde_json::from_str(&text).map_err(|e| BrowserError::JsonParse {
            context: format!("{} response", command),
            source: e,
        })?;

        if status.is_success() {
            return Ok(wire.value);
        }

        let error: WireError = serde_json::from_value(wire.value).map_err(|e| BrowserError::JsonParse {
            context: format!("{} error body", command),
            source: e,
        })?;
        Err(map_wire_error(command, error))
    }

    fn element_command(
        &self,
        method: Method,
        element: &ElementRef,
        suffix: &str,
        body: Option<Value>,
        command: &str,
    ) -> Result<Value, BrowserError> {
        let path = self.element_path(element, suffix)?;
        match self.send(method, &path, body, command) {
            Err(BrowserError::Protocol { error, .. })
                if error.starts_with("element not interactable")
                    || error.starts_with("element click intercepted") =>
            {
                Err(BrowserError::NotInteractable {
                    locator: self.locator_of(element),
                    timeout_ms: 0,
                })
            }
            other => other,
        }
    }

    fn locator_of(&self, element: &ElementRef) -> LocatorSpec {
        self.known
            .get(&element.0)
            .cloned()
            .unwrap_or_else(|| LocatorSpec::css(format!("<element {}>", element.0)))
    }
}

impl Browser for WebDriverBrowser {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let path = self.session_path("/url")?;
        match self.send(Method::POST, &path, Some(json!({ "url": url })), "navigate") {
            Ok(_) => {
                self.known.clear();
                Ok(())
            }
            Err(BrowserError::Protocol { error, .. }) => Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: error,
            }),
            Err(e) => Err(e),
        }
    }

    fn find_all(&mut self, locator: &LocatorSpec) -> Result<Vec<ElementRef>, BrowserError> {
        let path = self.session_path("/elements")?;
        let request = FindRequest::for_locator(locator);
        let body = serde_json::to_value(&request).map_err(|e| BrowserError::JsonParse {
            context: "FindRequest".into(),
            source: e,
        })?;

        let value = match self.send(Method::POST, &path, Some(body), "find elements") {
            Ok(value) => value,
            Err(BrowserError::Protocol { error, .. }) if error.starts_with("no such element") => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let elements: Vec<ElementRef> = value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item[ELEMENT_KEY].as_str())
                    .map(|id| ElementRef(id.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        for element in &elements {
            self.known.insert(element.0.clone(), locator.clone());
        }
        Ok(elements)
    }

    fn clear(&mut self, element: &ElementRef) -> Result<(), BrowserError> {
        self.element_command(Method::POST, element, "/clear", Some(json!({})), "clear")?;
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), BrowserError> {
        self.element_command(Method::POST, element, "/value", Some(json!({ "text": text })), "send keys")?;
        Ok(())
    }

    fn click(&mut self, element: &ElementRef) -> Result<(), BrowserError> {
        self.element_command(Method::POST, element, "/click", Some(json!({})), "click")?;
        Ok(())
    }

    fn submit(&mut self, element: &ElementRef) -> Result<(), BrowserError> {
        self.element_command(Method::POST, element, "/value", Some(json!({ "text": ENTER_KEY })), "submit")?;
        Ok(())
    }

    fn text(&mut self, element: &ElementRef) -> Result<String, BrowserError> {
        let value = self.element_command(Method::GET, element, "/text", None, "get text")?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn is_displayed(&mut self, element: &ElementRef) -> Result<bool, BrowserError> {
        let value = self.element_command(Method::GET, element, "/displayed", None, "is displayed")?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn is_enabled(&mut self, element: &ElementRef) -> Result<bool, BrowserError> {
        let value = self.element_command(Method::GET, element, "/enabled", None, "is enabled")?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn page_source(&mut self) -> Result<String, BrowserError> {
        let path = self.session_path("/source")?;
        let value = self.send(Method::GET, &path, None, "page source")?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn current_url(&mut self) -> Result<String, BrowserError> {
        let path = self.session_path("/url")?;
        let value = self.send(Method::GET, &path, None, "current url")?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| BrowserError::protocol("current url", "no URL in response"))
    }

    fn quit(&mut self) -> Result<(), BrowserError> {
        let Some(id) = self.session_id.take() else {
            return Ok(());
        };
        let path = format!("/session/{}", id);
        self.send(Method::DELETE, &path, None, "delete session")?;
        tracing::info!(session_id = %id, "webdriver session closed");
        Ok(())
    }
}
