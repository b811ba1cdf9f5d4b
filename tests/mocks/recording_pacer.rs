use std::sync::{Arc, Mutex};
use std::time::Duration;
use wpbot::dispatch::Pacer;

/// Pacer that records requested pauses instead of sleeping.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct RecordingPacer {
    pauses: Arc<Mutex<Vec<Duration>>>,
}

#[allow(dead_code)]
impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.pauses.lock().unwrap().iter().sum()
    }
}

impl Pacer for RecordingPacer {
    fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}
