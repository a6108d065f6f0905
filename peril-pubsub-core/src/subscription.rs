// peril-pubsub-core/src/subscription.rs
use std::future::Future;

use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

use crate::{DispatchStats, PubSubError};

/// Receiving half of a subscription's stop request.
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// Resolves once a stop is requested. If the requesting side is dropped
    /// without asking, this never resolves.
    pub async fn requested(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Handle to one running dispatch task.
///
/// Dropping the handle detaches the task: it keeps consuming until its
/// delivery stream closes.
pub struct Subscription {
    queue: String,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<DispatchStats>,
}

impl Subscription {
    /// Spawn `run` on the tokio runtime, handing it the stop signal.
    pub fn spawn<F, Fut>(queue: impl Into<String>, run: F) -> Self
    where
        F: FnOnce(StopSignal) -> Fut,
        Fut: Future<Output = DispatchStats> + Send + 'static,
    {
        let (stop_tx, rx) = watch::channel(false);
        let task = tokio::spawn(run(StopSignal { rx }));
        Self {
            queue: queue.into(),
            stop_tx,
            task,
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Ask the dispatch loop to exit after the delivery in hand is settled.
    pub fn stop(&self) {
        debug!(queue = %self.queue, "stop requested");
        // fails only when the task already ended
        let _ = self.stop_tx.send(true);
    }

    /// Wait for the dispatch loop to end on its own.
    pub async fn join(self) -> Result<DispatchStats, PubSubError> {
        self.task
            .await
            .map_err(|e| PubSubError::Task(format!("queue {}: {e}", self.queue)))
    }

    pub async fn shutdown(self) -> Result<DispatchStats, PubSubError> {
        self.stop();
        self.join().await
    }
}
