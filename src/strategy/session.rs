//! Persistent session strategy.

use super::{SendError, SendStrategy};
use crate::domain::CanonicalNumber;

/// Floor for the login wait; a person may have to scan a QR code.
pub const MIN_LOGIN_TIMEOUT_SECS: u64 = 30;

/// A long-lived, logged-in browser session.
pub trait ChatSession: Send {
    /// Block until the web client shows it is logged in, or fail after
    /// `timeout_seconds`.
    fn ensure_ready(&mut self, timeout_seconds: u64) -> Result<(), SendError>;

    /// Open the chat for `recipient` with `message` prefilled and send it.
    fn send_one(&mut self, recipient: &CanonicalNumber, message: &str) -> Result<(), SendError>;
}

/// Strategy that reuses one [`ChatSession`] for the whole batch.
pub struct PersistentSession<C> {
    session: C,
    login_timeout_seconds: u64,
    ready: bool,
}

impl<C: ChatSession> PersistentSession<C> {
    /// `initial_wait_seconds` is raised to [`MIN_LOGIN_TIMEOUT_SECS`] for the
    /// login wait.
    pub fn new(session: C, initial_wait_seconds: u64) -> Self {
        Self {
            session,
            login_timeout_seconds: initial_wait_seconds.max(MIN_LOGIN_TIMEOUT_SECS),
            ready: false,
        }
    }

    pub fn login_timeout_seconds(&self) -> u64 {
        self.login_timeout_seconds
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn into_inner(self) -> C {
        self.session
    }
}

impl<C: ChatSession> SendStrategy for PersistentSession<C> {
    fn name(&self) -> &'static str {
        "persistent session"
    }

    fn prepare(&mut self) -> Result<(), SendError> {
        if self.ready {
            return Ok(());
        }

        tracing::info!(
            "Waiting up to {}s for WhatsApp Web login (scan the QR code if prompted)",
            self.login_timeout_seconds
        );

        self.session
            .ensure_ready(self.login_timeout_seconds)
            .map_err(|e| SendError::Infrastructure(format!("login not completed: {}", e.reason())))?;

        self.ready = true;
        tracing::info!("WhatsApp Web session is ready");
        Ok(())
    }

    fn send_one(&mut self, recipient: &CanonicalNumber, message: &str) -> Result<(), SendError> {
        if !self.ready {
            return Err(SendError::Infrastructure(
                "browser session is not logged in".to_string(),
            ));
        }

        self.session.send_one(recipient, message)
    }
}
