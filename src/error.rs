//! Error types for WPBot.
//!
//! This module defines custom error types using `thiserror` for precise error handling.
//! Per-line validation problems live in [`crate::normalization::Rejection`] and
//! per-recipient send failures in [`crate::strategy::SendError`]; the types here
//! cover the conditions that stop a run.

use crate::dispatch::BatchReport;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to a WebDriver endpoint.
#[derive(Error, Debug)]
pub enum WebDriverError {
    /// The WebDriver endpoint could not be reached at all
    #[error("WebDriver endpoint unreachable: {0}")]
    Unreachable(String),

    /// The driver refused to start a browser session
    #[error("Browser session could not be created: {0}")]
    SessionNotCreated(String),

    /// The browser session died or was closed underneath us
    #[error("Browser session is no longer valid: {0}")]
    InvalidSession(String),

    /// No element matched the selector
    #[error("No element matches selector: {0}")]
    NoSuchElement(String),

    /// An element did not appear before the deadline
    #[error("Timed out after {seconds}s waiting for {selector}")]
    WaitTimeout { selector: String, seconds: u64 },

    /// The driver returned a W3C error payload
    #[error("WebDriver error (status {status}, {error}): {message}")]
    Protocol {
        status: u16,
        error: String,
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Failed to parse JSON response
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The response did not have the expected shape
    #[error("Unexpected WebDriver response: {0}")]
    UnexpectedResponse(String),
}

impl WebDriverError {
    /// Whether the error means the automation channel itself is gone.
    ///
    /// Infrastructure errors abort the rest of a batch; everything else is
    /// charged to the recipient being processed.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::Unreachable(_) | Self::SessionNotCreated(_) | Self::InvalidSession(_)
        )
    }
}

/// Errors that can occur while assembling a run (configuration taxonomy).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable or flag has an invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Both an inline message and a message file were supplied
    #[error("Provide either --message or --message-file, not both")]
    ConflictingMessageSources,

    /// Neither an inline message nor a message file was supplied
    #[error("A message is required. Use --message or --message-file")]
    MissingMessage,

    /// The message is empty after trimming
    #[error("The message is empty")]
    EmptyMessage,

    /// The recipients file does not exist
    #[error("Recipients file not found: {}", .0.display())]
    RecipientsFileNotFound(PathBuf),

    /// The message file does not exist
    #[error("Message file not found: {}", .0.display())]
    MessageFileNotFound(PathBuf),

    /// A custom country table could not be loaded
    #[error("Invalid country table {}: {reason}", .path.display())]
    InvalidCountryTable { path: PathBuf, reason: String },

    /// Reading an input file failed
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a batch dispatch.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The automation channel failed; the rest of the batch was never attempted
    #[error(
        "Batch aborted after {} of {} recipient(s): {reason}",
        .report.outcomes.len(),
        .report.total()
    )]
    Infrastructure {
        reason: String,
        report: Box<BatchReport>,
    },

    /// The background worker running the batch panicked or was cancelled.
    ///
    /// Release builds use `panic = "abort"`, so there a panic ends the
    /// process instead and this variant only reports cancellation. Builds
    /// that unwind (dev and test profiles) also report panics here.
    #[error("Batch worker failed: {0}")]
    Worker(String),
}

impl DispatchError {
    /// The partial report, when the batch got far enough to produce one.
    pub fn report(&self) -> Option<&BatchReport> {
        match self {
            Self::Infrastructure { report, .. } => Some(report),
            Self::Worker(_) => None,
        }
    }
}

/// Convenience type alias for Results with WebDriverError
pub type WebDriverResult<T> = Result<T, WebDriverError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
