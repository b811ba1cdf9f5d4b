//! Per-recipient outcomes and the batch report.

use crate::domain::CanonicalNumber;
use chrono::{DateTime, Utc};

/// Result of one send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Failed { reason: String },
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// Outcome for one attempted recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientOutcome {
    /// 1-based position in the batch
    pub index: usize,
    pub recipient: CanonicalNumber,
    pub outcome: SendOutcome,
}

/// Everything a single dispatch call did.
///
/// Recipients the dispatcher never reached (after an infrastructure abort)
/// are listed in `not_attempted`, never in `outcomes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<RecipientOutcome>,
    pub not_attempted: Vec<CanonicalNumber>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub(crate) fn empty(started_at: DateTime<Utc>) -> Self {
        Self {
            outcomes: Vec::new(),
            not_attempted: Vec::new(),
            started_at,
            finished_at: started_at,
        }
    }

    /// True when there was nothing to send.
    pub fn is_noop(&self) -> bool {
        self.outcomes.is_empty() && self.not_attempted.is_empty()
    }

    /// Number of recipients in the batch, attempted or not.
    pub fn total(&self) -> usize {
        self.outcomes.len() + self.not_attempted.len()
    }

    pub fn sent_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.is_sent()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.sent_count()
    }

    /// Wall-clock time the batch took.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Recipients that were attempted and failed.
    pub fn failed(&self) -> impl Iterator<Item = &RecipientOutcome> {
        self.outcomes.iter().filter(|o| !o.outcome.is_sent())
    }
}
