//! Synchronous W3C WebDriver client.
//!
//! This module talks the WebDriver wire protocol to a driver such as
//! chromedriver over plain HTTP. Only the handful of commands needed to open
//! WhatsApp Web, wait for elements and press keys are implemented. The
//! client blocks; the dispatcher runs it on a worker thread.

mod browser;
mod chat_session;
mod launcher;

pub use browser::{deep_link, BrowserOptions};
pub use chat_session::{WebDriverChatSession, LOGIN_READY_SELECTOR, MESSAGE_INPUT_SELECTOR};
pub use launcher::WebDriverLauncher;

use crate::config::Config;
use crate::error::{WebDriverError, WebDriverResult};
use crate::metrics::{Metrics, RequestTimer};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// W3C key code for Enter.
pub const ENTER_KEY: &str = "\u{E007}";

/// Key under which W3C drivers return element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// An open browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A reference to an element in a session's current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementId(String);

impl ElementId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
struct NewSessionValue {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// W3C error payload, found under `value` in error responses.
#[derive(Debug, Deserialize)]
struct ErrorValue {
    error: String,
    #[serde(default)]
    message: String,
}

/// HTTP client for a WebDriver endpoint.
///
/// This client uses `ureq` for synchronous HTTP requests.
#[derive(Clone)]
pub struct WebDriverClient {
    /// Base URL of the driver
    base_url: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Delay between element lookups while waiting
    poll_interval: Duration,

    /// Metrics collector
    metrics: Metrics,
}

impl WebDriverClient {
    /// Create a new client from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.webdriver_url.clone(),
            agent: Arc::new(agent),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            metrics: Metrics::new(),
        }
    }

    /// Create a client with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            agent: Arc::new(agent),
            poll_interval: Duration::from_millis(50),
            metrics: Metrics::new(),
        }
    }

    /// Share an existing metrics collector.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Execute a POST command and return the `value` member of the response.
    fn post(&self, path: &str, body: &Value) -> WebDriverResult<Value> {
        let timer = RequestTimer::new(self.metrics.clone());
        let url = self.build_url(path);

        tracing::debug!("POST {}", url);

        let result = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(|e| self.map_error(e))
            .and_then(Self::read_value);

        match &result {
            Ok(_) => timer.complete(),
            Err(e) => {
                tracing::debug!("POST {} - Error: {}", url, e);
                timer.complete_with_error();
            }
        }

        result
    }

    /// Execute a DELETE command.
    fn delete(&self, path: &str) -> WebDriverResult<()> {
        let timer = RequestTimer::new(self.metrics.clone());
        let url = self.build_url(path);

        tracing::debug!("DELETE {}", url);

        let result = self
            .agent
            .delete(&url)
            .call()
            .map(|_| ())
            .map_err(|e| self.map_error(e));

        if result.is_ok() {
            timer.complete();
        } else {
            timer.complete_with_error();
        }

        result
    }

    /// Extract the `value` member of a successful response.
    fn read_value(response: ureq::Response) -> WebDriverResult<Value> {
        let body = response
            .into_string()
            .map_err(|e| WebDriverError::HttpError(e.to_string()))?;

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        let mut value: Value = serde_json::from_str(&body)?;
        Ok(value.get_mut("value").map(Value::take).unwrap_or(Value::Null))
    }

    /// Map a ureq error to a WebDriverError.
    fn map_error(&self, error: ureq::Error) -> WebDriverError {
        match error {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                let payload = serde_json::from_str::<Value>(&body)
                    .ok()
                    .and_then(|mut v| v.get_mut("value").map(Value::take))
                    .and_then(|v| serde_json::from_value::<ErrorValue>(v).ok());

                match payload {
                    Some(ErrorValue { error, message }) => match error.as_str() {
                        "session not created" => WebDriverError::SessionNotCreated(message),
                        "invalid session id" => WebDriverError::InvalidSession(message),
                        "no such element" => WebDriverError::NoSuchElement(message),
                        _ => WebDriverError::Protocol {
                            status,
                            error,
                            message,
                        },
                    },
                    None => WebDriverError::Protocol {
                        status,
                        error: "unknown error".to_string(),
                        message: body,
                    },
                }
            }
            ureq::Error::Transport(transport) => match transport.kind() {
                ureq::ErrorKind::ConnectionFailed | ureq::ErrorKind::Dns => {
                    WebDriverError::Unreachable(transport.to_string())
                }
                _ => WebDriverError::HttpError(transport.to_string()),
            },
        }
    }

    // ========================= Session Operations =========================

    /// Start a new browser session.
    pub fn new_session(&self, options: &BrowserOptions) -> WebDriverResult<SessionId> {
        let body = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": options.chrome_args() }
                }
            }
        });

        let value = self.post("/session", &body).map_err(|e| match e {
            WebDriverError::Protocol { message, .. } => WebDriverError::SessionNotCreated(message),
            other => other,
        })?;

        let created: NewSessionValue = serde_json::from_value(value)
            .map_err(|e| WebDriverError::UnexpectedResponse(format!("new session: {}", e)))?;

        tracing::debug!("Browser session {} started", created.session_id);
        Ok(SessionId(created.session_id))
    }

    /// End a browser session, closing its windows.
    pub fn delete_session(&self, session: &SessionId) -> WebDriverResult<()> {
        self.delete(&format!("/session/{}", session.as_str()))
    }

    /// Navigate the session's current tab.
    pub fn navigate(&self, session: &SessionId, url: &str) -> WebDriverResult<()> {
        self.post(
            &format!("/session/{}/url", session.as_str()),
            &json!({ "url": url }),
        )?;
        Ok(())
    }

    /// Maximize the session's window.
    pub fn maximize_window(&self, session: &SessionId) -> WebDriverResult<()> {
        self.post(
            &format!("/session/{}/window/maximize", session.as_str()),
            &json!({}),
        )?;
        Ok(())
    }

    // ========================= Element Operations =========================

    /// Find the first element matching a CSS selector.
    pub fn find_element(&self, session: &SessionId, selector: &str) -> WebDriverResult<ElementId> {
        let value = self.post(
            &format!("/session/{}/element", session.as_str()),
            &json!({ "using": "css selector", "value": selector }),
        )?;

        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(|id| ElementId(id.to_string()))
            .ok_or_else(|| {
                WebDriverError::UnexpectedResponse(format!("no element reference for {}", selector))
            })
    }

    /// Poll for an element until it appears or `timeout` elapses.
    pub fn wait_for_element(
        &self,
        session: &SessionId,
        selector: &str,
        timeout: Duration,
    ) -> WebDriverResult<ElementId> {
        let deadline = Instant::now() + timeout;

        loop {
            match self.find_element(session, selector) {
                Ok(element) => return Ok(element),
                Err(WebDriverError::NoSuchElement(_)) => {}
                Err(e) => return Err(e),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(WebDriverError::WaitTimeout {
                    selector: selector.to_string(),
                    seconds: timeout.as_secs(),
                });
            }

            thread::sleep(self.poll_interval.min(deadline - now));
        }
    }

    /// Type `text` into an element. Use [`ENTER_KEY`] to press Enter.
    pub fn send_keys(
        &self,
        session: &SessionId,
        element: &ElementId,
        text: &str,
    ) -> WebDriverResult<()> {
        self.post(
            &format!(
                "/session/{}/element/{}/value",
                session.as_str(),
                element.as_str()
            ),
            &json!({ "text": text }),
        )?;
        Ok(())
    }
}
