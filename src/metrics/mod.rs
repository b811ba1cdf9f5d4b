//! Basic metrics instrumentation for a run.
//!
//! Provides counters and duration tracking for WebDriver requests and
//! per-recipient send outcomes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector shared by the WebDriver client and the dispatcher.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of WebDriver requests made
    webdriver_requests_total: Arc<AtomicU64>,

    /// Total number of WebDriver requests that failed
    webdriver_errors_total: Arc<AtomicU64>,

    /// Total duration of all WebDriver requests in milliseconds
    webdriver_duration_total_ms: Arc<AtomicU64>,

    /// Recipients the send strategy reported as sent
    messages_sent_total: Arc<AtomicU64>,

    /// Recipients the send strategy reported as failed
    messages_failed_total: Arc<AtomicU64>,

    /// Candidate lines dropped before dispatch
    recipients_skipped_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            webdriver_requests_total: Arc::new(AtomicU64::new(0)),
            webdriver_errors_total: Arc::new(AtomicU64::new(0)),
            webdriver_duration_total_ms: Arc::new(AtomicU64::new(0)),
            messages_sent_total: Arc::new(AtomicU64::new(0)),
            messages_failed_total: Arc::new(AtomicU64::new(0)),
            recipients_skipped_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a WebDriver request with duration.
    pub fn record_request(&self, duration: Duration) {
        self.webdriver_requests_total.fetch_add(1, Ordering::Relaxed);
        self.webdriver_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a failed WebDriver request.
    pub fn record_request_error(&self) {
        self.webdriver_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a recipient sent.
    pub fn record_message_sent(&self) {
        self.messages_sent_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a recipient failed.
    pub fn record_message_failed(&self) {
        self.messages_failed_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record candidate lines dropped before dispatch.
    pub fn record_recipients_skipped(&self, count: usize) {
        self.recipients_skipped_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn webdriver_requests_total(&self) -> u64 {
        self.webdriver_requests_total.load(Ordering::Relaxed)
    }

    pub fn webdriver_errors_total(&self) -> u64 {
        self.webdriver_errors_total.load(Ordering::Relaxed)
    }

    pub fn webdriver_duration_total_ms(&self) -> u64 {
        self.webdriver_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average WebDriver request duration in milliseconds.
    pub fn webdriver_duration_avg_ms(&self) -> f64 {
        let total = self.webdriver_duration_total_ms.load(Ordering::Relaxed);
        let count = self.webdriver_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn messages_sent_total(&self) -> u64 {
        self.messages_sent_total.load(Ordering::Relaxed)
    }

    pub fn messages_failed_total(&self) -> u64 {
        self.messages_failed_total.load(Ordering::Relaxed)
    }

    pub fn recipients_skipped_total(&self) -> u64 {
        self.recipients_skipped_total.load(Ordering::Relaxed)
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            webdriver_requests_total: self.webdriver_requests_total(),
            webdriver_errors_total: self.webdriver_errors_total(),
            webdriver_duration_avg_ms: self.webdriver_duration_avg_ms(),
            messages_sent_total: self.messages_sent_total(),
            messages_failed_total: self.messages_failed_total(),
            recipients_skipped_total: self.recipients_skipped_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub webdriver_requests_total: u64,
    pub webdriver_errors_total: u64,
    pub webdriver_duration_avg_ms: f64,
    pub messages_sent_total: u64,
    pub messages_failed_total: u64,
    pub recipients_skipped_total: u64,
}

/// Helper for timing WebDriver requests.
pub struct RequestTimer {
    start: Instant,
    metrics: Metrics,
}

impl RequestTimer {
    /// Start timing a request.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        let duration = self.start.elapsed();
        self.metrics.record_request(duration);
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        let duration = self.start.elapsed();
        self.metrics.record_request(duration);
        self.metrics.record_request_error();
    }
}
