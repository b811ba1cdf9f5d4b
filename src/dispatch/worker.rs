//! Background batch worker.
//!
//! Runs the blocking dispatch loop on tokio's blocking thread pool so the
//! caller's task stays responsive. Progress comes back only through the
//! event channel; the worker shares no mutable state with the caller.

use super::dispatcher::Dispatcher;
use super::events::DispatchEvent;
use super::pacing::Pacer;
use super::report::BatchReport;
use crate::domain::CanonicalNumber;
use crate::error::DispatchError;
use crate::strategy::SendStrategy;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle to a batch running on a worker thread.
pub struct BatchHandle {
    events: mpsc::UnboundedReceiver<DispatchEvent>,
    join: JoinHandle<Result<BatchReport, DispatchError>>,
}

impl BatchHandle {
    /// Next progress event, or `None` once the worker has finished and every
    /// event has been delivered.
    pub async fn next_event(&mut self) -> Option<DispatchEvent> {
        self.events.recv().await
    }

    /// Wait for the worker and return the batch result. Events not yet
    /// received are dropped.
    pub async fn finish(self) -> Result<BatchReport, DispatchError> {
        self.join
            .await
            .map_err(|e| DispatchError::Worker(format!("Task join error: {}", e)))?
    }
}

/// Start `dispatcher` on a blocking worker thread.
///
/// Must be called from within a tokio runtime.
pub fn spawn_batch<P, S>(
    dispatcher: Dispatcher<P>,
    recipients: Vec<CanonicalNumber>,
    message: String,
    mut strategy: S,
) -> BatchHandle
where
    P: Pacer + 'static,
    S: SendStrategy + 'static,
{
    let (tx, events) = mpsc::unbounded_channel();
    let dispatcher = dispatcher.with_events(tx);

    let join = tokio::task::spawn_blocking(move || {
        dispatcher.dispatch(&recipients, &message, &mut strategy)
    });

    BatchHandle { events, join }
}
