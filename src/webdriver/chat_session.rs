//! Persistent WhatsApp Web session driven over WebDriver.

use super::browser::{deep_link, BrowserOptions};
use super::{SessionId, WebDriverClient, ENTER_KEY};
use crate::domain::CanonicalNumber;
use crate::error::WebDriverError;
use crate::strategy::{ChatSession, SendError};
use std::time::Duration;

/// Present once WhatsApp Web has finished logging in.
pub const LOGIN_READY_SELECTOR: &str = "div[role='textbox']";

/// The message composer of an open chat.
pub const MESSAGE_INPUT_SELECTOR: &str = "div[contenteditable='true'][data-tab='10']";

/// One browser window kept open for a whole batch.
///
/// The browser is started lazily by [`ChatSession::ensure_ready`] and closed
/// when the value is dropped.
pub struct WebDriverChatSession {
    client: WebDriverClient,
    options: BrowserOptions,
    web_client_url: String,
    message_timeout: Duration,
    session: Option<SessionId>,
}

impl WebDriverChatSession {
    /// `message_timeout_seconds` bounds how long each chat may take to open.
    pub fn new(
        client: WebDriverClient,
        options: BrowserOptions,
        web_client_url: impl Into<String>,
        message_timeout_seconds: u64,
    ) -> Self {
        Self {
            client,
            options,
            web_client_url: web_client_url.into(),
            message_timeout: Duration::from_secs(message_timeout_seconds),
            session: None,
        }
    }

    fn start(&mut self) -> Result<SessionId, WebDriverError> {
        if let Some(session) = &self.session {
            return Ok(session.clone());
        }

        let session = self.client.new_session(&self.options)?;
        if let Err(e) = self.client.maximize_window(&session) {
            tracing::debug!("Could not maximize browser window: {}", e);
        }
        self.session = Some(session.clone());
        Ok(session)
    }
}

impl ChatSession for WebDriverChatSession {
    fn ensure_ready(&mut self, timeout_seconds: u64) -> Result<(), SendError> {
        let session = self.start()?;
        self.client.navigate(&session, &self.web_client_url)?;
        self.client.wait_for_element(
            &session,
            LOGIN_READY_SELECTOR,
            Duration::from_secs(timeout_seconds),
        )?;
        Ok(())
    }

    fn send_one(&mut self, recipient: &CanonicalNumber, message: &str) -> Result<(), SendError> {
        let Some(session) = self.session.clone() else {
            return Err(SendError::Infrastructure(
                "browser session has not been started".to_string(),
            ));
        };

        let url = deep_link(&self.web_client_url, recipient, message);
        self.client.navigate(&session, &url)?;

        let input = self
            .client
            .wait_for_element(&session, MESSAGE_INPUT_SELECTOR, self.message_timeout)?;
        self.client.send_keys(&session, &input, ENTER_KEY)?;

        tracing::debug!("Message submitted to {}", recipient);
        Ok(())
    }
}

impl Drop for WebDriverChatSession {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = self.client.delete_session(&session) {
                tracing::debug!("Failed to close browser session: {}", e);
            }
        }
    }
}
