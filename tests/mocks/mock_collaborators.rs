use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use wpbot::strategy::{ChatSession, OneShotLauncher, SendError};
use wpbot::CanonicalNumber;

/// Arguments of one launcher invocation.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCall {
    pub recipient: String,
    pub message: String,
    pub wait_seconds: u64,
    pub close_tab: bool,
    pub close_time_seconds: u64,
}

/// Mock one-shot launcher recording every call.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockLauncher {
    calls: Arc<Mutex<Vec<LaunchCall>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

#[allow(dead_code)]
impl MockLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().insert(recipient.to_string());
    }

    pub fn calls(&self) -> Vec<LaunchCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl OneShotLauncher for MockLauncher {
    fn send_one(
        &mut self,
        recipient: &CanonicalNumber,
        message: &str,
        wait_seconds: u64,
        close_tab: bool,
        close_time_seconds: u64,
    ) -> Result<(), SendError> {
        self.calls.lock().unwrap().push(LaunchCall {
            recipient: recipient.to_string(),
            message: message.to_string(),
            wait_seconds,
            close_tab,
            close_time_seconds,
        });

        if self.failing.lock().unwrap().contains(recipient.as_str()) {
            return Err(SendError::Delivery("chat did not open".to_string()));
        }
        Ok(())
    }
}

/// Mock chat session; logs in successfully unless told otherwise.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockChatSession {
    login_fails: Arc<Mutex<bool>>,
    ready_timeouts: Arc<Mutex<Vec<u64>>>,
    sent: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

#[allow(dead_code)]
impl MockChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn never_logs_in(&self) {
        *self.login_fails.lock().unwrap() = true;
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().insert(recipient.to_string());
    }

    /// Timeouts passed to each `ensure_ready` call.
    pub fn ready_timeouts(&self) -> Vec<u64> {
        self.ready_timeouts.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl ChatSession for MockChatSession {
    fn ensure_ready(&mut self, timeout_seconds: u64) -> Result<(), SendError> {
        self.ready_timeouts.lock().unwrap().push(timeout_seconds);
        if *self.login_fails.lock().unwrap() {
            return Err(SendError::Delivery(format!(
                "Timed out after {}s waiting for login",
                timeout_seconds
            )));
        }
        Ok(())
    }

    fn send_one(&mut self, recipient: &CanonicalNumber, _message: &str) -> Result<(), SendError> {
        if self.failing.lock().unwrap().contains(recipient.as_str()) {
            return Err(SendError::Delivery("message input not found".to_string()));
        }
        self.sent.lock().unwrap().push(recipient.to_string());
        Ok(())
    }
}
