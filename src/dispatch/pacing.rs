//! Pacing between sends.

use std::thread;
use std::time::Duration;

/// Fixed delays applied by the dispatcher.
///
/// After a successful send the dispatcher waits
/// `max(minimum_settle, per_send_wait + settle_margin)` so the web client
/// can reload before the next chat is opened. After a failure it waits
/// `failure_cooldown`. Neither delay is a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    pub minimum_settle: Duration,
    pub per_send_wait: Duration,
    pub settle_margin: Duration,
    pub failure_cooldown: Duration,
}

impl PacingConfig {
    /// Pacing for the scripted one-shot strategy: at least 20s, or the page
    /// wait plus 10s, after a send; 5s after a failure.
    pub fn scripted(per_send_wait_seconds: u64) -> Self {
        Self {
            minimum_settle: Duration::from_secs(20),
            per_send_wait: Duration::from_secs(per_send_wait_seconds),
            settle_margin: Duration::from_secs(10),
            failure_cooldown: Duration::from_secs(5),
        }
    }

    /// Pacing for the persistent session strategy: the chat view is already
    /// loaded when the send returns, so 3s after a send and 2s after a failure.
    pub fn persistent_session() -> Self {
        Self {
            minimum_settle: Duration::from_secs(3),
            per_send_wait: Duration::ZERO,
            settle_margin: Duration::ZERO,
            failure_cooldown: Duration::from_secs(2),
        }
    }

    /// No delays at all.
    pub fn none() -> Self {
        Self {
            minimum_settle: Duration::ZERO,
            per_send_wait: Duration::ZERO,
            settle_margin: Duration::ZERO,
            failure_cooldown: Duration::ZERO,
        }
    }

    /// Delay after a successful send.
    pub fn after_success(&self) -> Duration {
        self.minimum_settle
            .max(self.per_send_wait + self.settle_margin)
    }

    /// Delay after a failed send.
    pub fn after_failure(&self) -> Duration {
        self.failure_cooldown
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self::scripted(40)
    }
}

/// Something that can block the dispatch thread for a while.
pub trait Pacer: Send {
    fn pause(&self, duration: Duration);
}

/// Blocking sleep on the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}
