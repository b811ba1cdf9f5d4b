//! The sequential batch dispatcher.

use super::events::{DispatchEvent, EventSender};
use super::pacing::{Pacer, PacingConfig, ThreadPacer};
use super::report::{BatchReport, RecipientOutcome, SendOutcome};
use crate::domain::CanonicalNumber;
use crate::error::DispatchError;
use crate::metrics::Metrics;
use crate::strategy::{SendError, SendStrategy};
use chrono::Utc;

/// Sends one message to each recipient in order, one at a time.
///
/// A per-recipient failure is recorded and the loop moves on after the
/// failure cooldown; failed recipients are never retried. An
/// infrastructure failure stops the loop and is returned as
/// [`DispatchError::Infrastructure`] carrying the partial report.
pub struct Dispatcher<P = ThreadPacer> {
    pacing: PacingConfig,
    pacer: P,
    metrics: Metrics,
    events: Option<EventSender>,
}

impl Dispatcher<ThreadPacer> {
    /// Create a dispatcher that sleeps the current thread between sends.
    pub fn new(pacing: PacingConfig) -> Self {
        Self {
            pacing,
            pacer: ThreadPacer,
            metrics: Metrics::new(),
            events: None,
        }
    }
}

impl<P: Pacer> Dispatcher<P> {
    /// Replace the pacer (tests use one that records instead of sleeping).
    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> Dispatcher<Q> {
        Dispatcher {
            pacing: self.pacing,
            pacer,
            metrics: self.metrics,
            events: self.events,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Forward progress events to `events` as well as the log.
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn pacing(&self) -> &PacingConfig {
        &self.pacing
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn emit(&self, event: DispatchEvent) {
        if let Some(events) = &self.events {
            // The receiver may have gone away; the batch still runs to completion.
            let _ = events.send(event);
        }
    }

    /// Deliver `message` to every recipient using `strategy`.
    ///
    /// An empty list is a no-op: the strategy is not prepared and the
    /// returned report has no outcomes.
    pub fn dispatch<S>(
        &self,
        recipients: &[CanonicalNumber],
        message: &str,
        strategy: &mut S,
    ) -> Result<BatchReport, DispatchError>
    where
        S: SendStrategy + ?Sized,
    {
        let mut report = BatchReport::empty(Utc::now());

        if recipients.is_empty() {
            tracing::info!("No valid recipients found.");
            self.emit(DispatchEvent::NoRecipients);
            return Ok(report);
        }

        let total = recipients.len();

        if let Err(e) = strategy.prepare() {
            return Err(self.abort(report, recipients, e));
        }

        tracing::info!(
            "Starting to send message to {} recipient(s) using {}...",
            total,
            strategy.name()
        );
        self.emit(DispatchEvent::Started {
            total,
            strategy: strategy.name(),
        });

        for (position, recipient) in recipients.iter().enumerate() {
            let index = position + 1;
            tracing::info!("[{}/{}] Sending to {} ...", index, total, recipient);
            self.emit(DispatchEvent::Sending {
                index,
                total,
                recipient: recipient.clone(),
            });

            match strategy.send_one(recipient, message) {
                Ok(()) => {
                    self.metrics.record_message_sent();
                    report.outcomes.push(RecipientOutcome {
                        index,
                        recipient: recipient.clone(),
                        outcome: SendOutcome::Sent,
                    });
                    self.emit(DispatchEvent::Sent {
                        index,
                        total,
                        recipient: recipient.clone(),
                    });
                    self.pacer.pause(self.pacing.after_success());
                }
                Err(e) => {
                    tracing::warn!("Failed to send to {}: {}", recipient, e);
                    self.metrics.record_message_failed();
                    report.outcomes.push(RecipientOutcome {
                        index,
                        recipient: recipient.clone(),
                        outcome: SendOutcome::Failed {
                            reason: e.reason().to_string(),
                        },
                    });
                    self.emit(DispatchEvent::Failed {
                        index,
                        total,
                        recipient: recipient.clone(),
                        reason: e.reason().to_string(),
                    });

                    if e.is_fatal() {
                        return Err(self.abort(report, &recipients[index..], e));
                    }

                    self.pacer.pause(self.pacing.after_failure());
                }
            }
        }

        report.finished_at = Utc::now();
        let (sent, failed) = (report.sent_count(), report.failed_count());
        tracing::info!("Done. {} sent, {} failed.", sent, failed);
        self.emit(DispatchEvent::Finished { sent, failed });

        Ok(report)
    }

    fn abort(
        &self,
        mut report: BatchReport,
        remaining: &[CanonicalNumber],
        error: SendError,
    ) -> DispatchError {
        report.not_attempted = remaining.to_vec();
        report.finished_at = Utc::now();

        let reason = error.reason().to_string();
        tracing::error!(
            "Aborting batch: {} ({} recipient(s) not attempted)",
            reason,
            remaining.len()
        );
        self.emit(DispatchEvent::Aborted {
            reason: reason.clone(),
            not_attempted: remaining.len(),
        });

        DispatchError::Infrastructure {
            reason,
            report: Box::new(report),
        }
    }
}
