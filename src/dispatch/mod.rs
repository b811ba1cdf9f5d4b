//! Batch dispatch.
//!
//! The [`Dispatcher`] walks a recipient list strictly in order, calls the
//! selected [`crate::strategy::SendStrategy`] once per recipient and pauses
//! according to [`PacingConfig`]. [`spawn_batch`] runs the same loop on a
//! blocking worker thread and streams [`DispatchEvent`]s back over a channel.

mod dispatcher;
mod events;
mod pacing;
mod report;
mod worker;

pub use dispatcher::Dispatcher;
pub use events::{DispatchEvent, EventSender};
pub use pacing::{Pacer, PacingConfig, ThreadPacer};
pub use report::{BatchReport, RecipientOutcome, SendOutcome};
pub use worker::{spawn_batch, BatchHandle};
