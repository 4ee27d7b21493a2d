//! Bounded pool for work the gateway runs off the request task.
//!
//! At most `max_workers` submissions execute concurrently and at most
//! `queue_capacity` more wait for a slot. A submission arriving when both are
//! full is rejected immediately instead of queueing without bound.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;

use crate::config::OffloadConfig;

#[derive(Debug, thiserror::Error)]
pub enum OffloadError {
    #[error("Async pool is saturated ({capacity} tasks already admitted)")]
    Saturated { capacity: usize },

    #[error("Async pool is shut down")]
    Closed,

    #[error("Async task failed: {0}")]
    TaskFailed(String),
}

pub struct OffloadPool {
    admission: Arc<Semaphore>,
    workers: Arc<Semaphore>,
    tracker: TaskTracker,
    capacity: usize,
    shutdown_timeout: Duration,
}

impl OffloadPool {
    pub fn new(config: &OffloadConfig) -> Self {
        let max_workers = config.max_workers.max(1);
        let capacity = max_workers + config.queue_capacity;
        tracing::info!(
            max_workers,
            queue_capacity = config.queue_capacity,
            "Async offload pool configured"
        );
        Self {
            admission: Arc::new(Semaphore::new(capacity)),
            workers: Arc::new(Semaphore::new(max_workers)),
            tracker: TaskTracker::new(),
            capacity,
            shutdown_timeout: config.shutdown_timeout,
        }
    }

    /// Run `task` on the pool and wait for its output.
    pub async fn submit<F, T>(&self, task: F) -> Result<T, OffloadError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        if self.tracker.is_closed() {
            return Err(OffloadError::Closed);
        }
        let admitted = Arc::clone(&self.admission)
            .try_acquire_owned()
            .map_err(|_| OffloadError::Saturated {
                capacity: self.capacity,
            })?;
        let workers = Arc::clone(&self.workers);

        let handle = self.tracker.spawn(async move {
            let _admitted = admitted;
            let _slot = workers.acquire_owned().await;
            task.await
        });

        handle
            .await
            .map_err(|e| OffloadError::TaskFailed(e.to_string()))
    }

    /// Submissions admitted and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stop admitting work and wait for admitted tasks to finish.
    ///
    /// Returns `false` if the shutdown timeout elapsed first.
    pub async fn shutdown(&self) -> bool {
        self.tracker.close();
        let in_flight = self.tracker.len();
        if in_flight > 0 {
            tracing::info!(in_flight, "Waiting for async tasks to finish");
        }
        let drained = tokio::time::timeout(self.shutdown_timeout, self.tracker.wait())
            .await
            .is_ok();
        if !drained {
            tracing::warn!(
                remaining = self.tracker.len(),
                "Async pool shutdown timed out"
            );
        }
        drained
    }
}
