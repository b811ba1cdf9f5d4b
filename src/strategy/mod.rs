//! Send strategies.
//!
//! The dispatcher only sees [`SendStrategy`]. Two variants exist, selected
//! once per batch:
//!
//! - [`ScriptedOneShot`]: a fresh browser automation run per recipient
//! - [`PersistentSession`]: one logged-in browser session for the whole batch

mod scripted;
mod session;

pub use scripted::{OneShotLauncher, OneShotOptions, ScriptedOneShot};
pub use session::{ChatSession, PersistentSession, MIN_LOGIN_TIMEOUT_SECS};

use crate::domain::CanonicalNumber;
use crate::error::WebDriverError;
use thiserror::Error;

/// Why a single send did not go through.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// This recipient failed; the batch continues
    #[error("{0}")]
    Delivery(String),

    /// The automation channel itself is unusable; the batch stops
    #[error("{0}")]
    Infrastructure(String),
}

impl SendError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Infrastructure(_))
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Delivery(reason) | Self::Infrastructure(reason) => reason,
        }
    }
}

impl From<WebDriverError> for SendError {
    fn from(error: WebDriverError) -> Self {
        if error.is_infrastructure() {
            Self::Infrastructure(error.to_string())
        } else {
            Self::Delivery(error.to_string())
        }
    }
}

/// A way of delivering one message to one recipient.
pub trait SendStrategy: Send {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// One-time setup before the first send. Any error aborts the batch.
    fn prepare(&mut self) -> Result<(), SendError> {
        Ok(())
    }

    /// Deliver `message` to `recipient`.
    fn send_one(&mut self, recipient: &CanonicalNumber, message: &str) -> Result<(), SendError>;
}

impl<S: SendStrategy + ?Sized> SendStrategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn prepare(&mut self) -> Result<(), SendError> {
        (**self).prepare()
    }

    fn send_one(&mut self, recipient: &CanonicalNumber, message: &str) -> Result<(), SendError> {
        (**self).send_one(recipient, message)
    }
}
