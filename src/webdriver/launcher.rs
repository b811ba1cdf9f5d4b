//! One browser per recipient.

use super::browser::{deep_link, BrowserOptions};
use super::chat_session::MESSAGE_INPUT_SELECTOR;
use super::{SessionId, WebDriverClient, ENTER_KEY};
use crate::dispatch::{Pacer, ThreadPacer};
use crate::domain::CanonicalNumber;
use crate::error::WebDriverError;
use crate::strategy::{OneShotLauncher, SendError};
use std::time::Duration;

/// A session left open after a send. Closed when dropped.
struct KeptOpen {
    client: WebDriverClient,
    session: SessionId,
}

impl Drop for KeptOpen {
    fn drop(&mut self) {
        if let Err(e) = self.client.delete_session(&self.session) {
            tracing::debug!("Failed to close kept-open browser session: {}", e);
        }
    }
}

/// Scripted launcher: every send starts a new browser session, opens the
/// deep link, presses Enter in the composer and optionally closes again.
///
/// At most one session is kept open. Chrome locks its profile directory, so
/// a tab left open by `close_tab = false` is closed before the next
/// recipient's session starts, and when the launcher is dropped.
pub struct WebDriverLauncher<P = ThreadPacer> {
    client: WebDriverClient,
    options: BrowserOptions,
    web_client_url: String,
    pacer: P,
    kept_open: Option<KeptOpen>,
}

impl WebDriverLauncher<ThreadPacer> {
    pub fn new(
        client: WebDriverClient,
        options: BrowserOptions,
        web_client_url: impl Into<String>,
    ) -> Self {
        if options.user_data_dir.is_none() {
            tracing::warn!(
                "No browser profile directory set; every scripted send starts logged out. \
                 Use --user-data-dir to keep the WhatsApp Web login"
            );
        }

        Self {
            client,
            options,
            web_client_url: web_client_url.into(),
            pacer: ThreadPacer,
            kept_open: None,
        }
    }
}

impl<P: Pacer> WebDriverLauncher<P> {
    /// Replace the pacer used for the close delay.
    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> WebDriverLauncher<Q> {
        WebDriverLauncher {
            client: self.client,
            options: self.options,
            web_client_url: self.web_client_url,
            pacer,
            kept_open: self.kept_open,
        }
    }

    /// Whether a session from an earlier send is still open.
    pub fn has_open_session(&self) -> bool {
        self.kept_open.is_some()
    }

    fn deliver(
        &self,
        session: &SessionId,
        recipient: &CanonicalNumber,
        message: &str,
        wait_seconds: u64,
    ) -> Result<(), WebDriverError> {
        let url = deep_link(&self.web_client_url, recipient, message);
        self.client.navigate(session, &url)?;

        let input = self.client.wait_for_element(
            session,
            MESSAGE_INPUT_SELECTOR,
            Duration::from_secs(wait_seconds),
        )?;
        self.client.send_keys(session, &input, ENTER_KEY)
    }
}

impl<P: Pacer> OneShotLauncher for WebDriverLauncher<P> {
    fn send_one(
        &mut self,
        recipient: &CanonicalNumber,
        message: &str,
        wait_seconds: u64,
        close_tab: bool,
        close_time_seconds: u64,
    ) -> Result<(), SendError> {
        // Release the profile lock held by a previously kept-open tab.
        self.kept_open = None;

        let session = self.client.new_session(&self.options)?;

        if let Err(e) = self.deliver(&session, recipient, message, wait_seconds) {
            // Best effort; the delivery error is what gets reported.
            let _ = self.client.delete_session(&session);
            return Err(e.into());
        }

        if close_tab {
            self.pacer.pause(Duration::from_secs(close_time_seconds));
            if let Err(e) = self.client.delete_session(&session) {
                tracing::warn!("Message sent to {} but closing the browser failed: {}", recipient, e);
            }
        } else {
            self.kept_open = Some(KeptOpen {
                client: self.client.clone(),
                session,
            });
        }

        Ok(())
    }
}
