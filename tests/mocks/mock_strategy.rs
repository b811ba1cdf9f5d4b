use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wpbot::strategy::{SendError, SendStrategy};
use wpbot::CanonicalNumber;

/// Mock send strategy with scripted per-recipient failures.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockStrategy {
    failures: Arc<Mutex<HashMap<String, SendError>>>,
    prepare_error: Arc<Mutex<Option<SendError>>>,
    sent: Arc<Mutex<Vec<(String, String)>>>,
    prepare_calls: Arc<Mutex<usize>>,
}

#[allow(dead_code)]
impl MockStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sends to `recipient` fail with `error`.
    pub fn fail_for(&self, recipient: &str, error: SendError) {
        self.failures
            .lock()
            .unwrap()
            .insert(recipient.to_string(), error);
    }

    pub fn fail_prepare(&self, error: SendError) {
        *self.prepare_error.lock().unwrap() = Some(error);
    }

    /// Every `(recipient, message)` the strategy was asked to send, in order.
    pub fn attempts(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempted_recipients(&self) -> Vec<String> {
        self.attempts().into_iter().map(|(r, _)| r).collect()
    }

    pub fn prepare_calls(&self) -> usize {
        *self.prepare_calls.lock().unwrap()
    }
}

impl SendStrategy for MockStrategy {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn prepare(&mut self) -> Result<(), SendError> {
        *self.prepare_calls.lock().unwrap() += 1;
        match self.prepare_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn send_one(&mut self, recipient: &CanonicalNumber, message: &str) -> Result<(), SendError> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), message.to_string()));

        match self.failures.lock().unwrap().get(recipient.as_str()) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
