//! WPBot - bulk WhatsApp sender.
//!
//! This library normalizes locally formatted phone numbers into canonical
//! international form and dispatches one message to a list of recipients by
//! driving WhatsApp Web through a WebDriver endpoint (e.g. chromedriver).
//!
//! # Architecture
//!
//! - **domain**: Value objects (`CanonicalNumber`) and the country rule table
//! - **normalization**: Country-aware number normalization
//! - **recipients**: Recipient file scanning and message source resolution
//! - **dispatch**: Sequential, paced batch dispatcher and its background worker
//! - **strategy**: The two interchangeable send strategies
//! - **webdriver**: Synchronous W3C WebDriver client and browser-backed collaborators
//! - **metrics**: Counters for WebDriver traffic and send outcomes
//! - **config**: Configuration management from environment variables
//! - **error**: Custom error types

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod normalization;
pub mod recipients;
pub mod strategy;
pub mod webdriver;

pub use config::Config;
pub use dispatch::{
    spawn_batch, BatchHandle, BatchReport, DispatchEvent, Dispatcher, PacingConfig,
    RecipientOutcome, SendOutcome,
};
pub use domain::{CanonicalNumber, CountryRule, CountryTable, ValidationError};
pub use error::{ConfigError, DispatchError, WebDriverError};
pub use metrics::{Metrics, MetricsSummary, RequestTimer};
pub use normalization::{normalize, normalize_for, normalize_lines, NormalizedBatch, Rejection};
pub use recipients::{build_recipient_list, dedupe, resolve_message, RecipientScan};
pub use strategy::{PersistentSession, ScriptedOneShot, SendError, SendStrategy};
pub use webdriver::{WebDriverChatSession, WebDriverClient, WebDriverLauncher};
