//! Scripted one-shot strategy.

use super::{SendError, SendStrategy};
use crate::domain::CanonicalNumber;

/// Opens a fresh automation run for a single recipient.
pub trait OneShotLauncher: Send {
    /// Open the chat for `recipient`, give the page up to `wait_seconds` to
    /// load, send `message`, and when `close_tab` is set close the browser
    /// after `close_time_seconds`.
    fn send_one(
        &mut self,
        recipient: &CanonicalNumber,
        message: &str,
        wait_seconds: u64,
        close_tab: bool,
        close_time_seconds: u64,
    ) -> Result<(), SendError>;
}

/// Options forwarded to the launcher on every send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneShotOptions {
    /// Seconds the web client gets to load before sending (default: 40)
    pub wait_seconds: u64,

    /// Close the browser after sending
    pub close_tab: bool,

    /// Seconds to wait before closing (default: 3)
    pub close_time_seconds: u64,
}

impl Default for OneShotOptions {
    fn default() -> Self {
        Self {
            wait_seconds: 40,
            close_tab: true,
            close_time_seconds: 3,
        }
    }
}

/// Strategy that hands every recipient to a fresh [`OneShotLauncher`] run.
pub struct ScriptedOneShot<L> {
    launcher: L,
    options: OneShotOptions,
}

impl<L: OneShotLauncher> ScriptedOneShot<L> {
    pub fn new(launcher: L, options: OneShotOptions) -> Self {
        Self { launcher, options }
    }

    pub fn options(&self) -> &OneShotOptions {
        &self.options
    }
}

impl<L: OneShotLauncher> SendStrategy for ScriptedOneShot<L> {
    fn name(&self) -> &'static str {
        "scripted one-shot"
    }

    fn send_one(&mut self, recipient: &CanonicalNumber, message: &str) -> Result<(), SendError> {
        self.launcher.send_one(
            recipient,
            message,
            self.options.wait_seconds,
            self.options.close_tab,
            self.options.close_time_seconds,
        )
    }
}
