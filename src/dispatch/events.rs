//! Progress events emitted while a batch runs.

use crate::domain::CanonicalNumber;
use std::fmt;
use tokio::sync::mpsc;

/// Channel used to hand events from the dispatch thread to whoever displays
/// progress. Sending never blocks.
pub type EventSender = mpsc::UnboundedSender<DispatchEvent>;

/// A progress notification from the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    /// The recipient list was empty; nothing was done.
    NoRecipients,

    /// Sending is about to start.
    Started { total: usize, strategy: &'static str },

    /// About to call the strategy for one recipient.
    Sending {
        index: usize,
        total: usize,
        recipient: CanonicalNumber,
    },

    Sent {
        index: usize,
        total: usize,
        recipient: CanonicalNumber,
    },

    Failed {
        index: usize,
        total: usize,
        recipient: CanonicalNumber,
        reason: String,
    },

    /// The automation channel failed; `not_attempted` recipients were skipped.
    Aborted { reason: String, not_attempted: usize },

    /// The loop reached the end of the list.
    Finished { sent: usize, failed: usize },
}

impl fmt::Display for DispatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRecipients => write!(f, "No valid recipients found."),
            Self::Started { total, strategy } => write!(
                f,
                "Starting to send message to {} recipient(s) ({})...",
                total, strategy
            ),
            Self::Sending {
                index,
                total,
                recipient,
            } => write!(f, "[{}/{}] Sending to {} ...", index, total, recipient),
            Self::Sent {
                index,
                total,
                recipient,
            } => write!(f, "[{}/{}] Sent to {}", index, total, recipient),
            Self::Failed {
                index,
                total,
                recipient,
                reason,
            } => write!(
                f,
                "[{}/{}] Failed to send to {}: {}",
                index, total, recipient, reason
            ),
            Self::Aborted {
                reason,
                not_attempted,
            } => write!(
                f,
                "Aborted: {} ({} recipient(s) not attempted)",
                reason, not_attempted
            ),
            Self::Finished { sent, failed } => {
                write!(f, "Done. {} sent, {} failed.", sent, failed)
            }
        }
    }
}
