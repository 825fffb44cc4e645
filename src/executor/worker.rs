//! Batch Worker
//!
//! Wraps the unit of work the scheduler runs for every dequeued batch. The work
//! is a type-erased async closure so the scheduler stays independent of what a
//! batch actually does: the service ships a fixed-delay stand-in, tests plug in
//! recording or failing closures.
//!
//! ## Result contract
//! `Ok(())` completes the batch. `Err` (or a panic inside the closure) is a work
//! failure; the scheduler decides between a retry and the terminal `Failed` status.

use super::types::{BatchId, Priority};

use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// What the unit of work receives for one attempt.
#[derive(Debug, Clone)]
pub struct BatchWork {
    pub batch_id: BatchId,
    pub ids: Vec<u64>,
    pub priority: Priority,
    /// 1-based attempt number.
    pub attempt: u32,
}

/// Type alias for a thread-safe, asynchronous unit of work.
pub type BatchWorkFn =
    Arc<dyn Fn(BatchWork) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync>;

#[derive(Clone)]
pub struct BatchWorker {
    name: String,
    work: BatchWorkFn,
}

impl BatchWorker {
    /// Wraps an async closure as a worker.
    ///
    /// # Arguments
    /// * `name` - Label used in logs.
    /// * `work` - The closure executed once per attempt.
    pub fn new<F, Fut>(name: &str, work: F) -> Self
    where
        F: Fn(BatchWork) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        // Box::pin erases the concrete future type so any async fn fits.
        let work: BatchWorkFn = Arc::new(move |batch: BatchWork| {
            Box::pin(work(batch)) as Pin<Box<dyn Future<Output = Result<()>> + Send>>
        });

        Self {
            name: name.to_string(),
            work,
        }
    }

    /// Stand-in for a downstream call: sleeps for `delay` and succeeds.
    pub fn simulated(delay: Duration) -> Self {
        Self::new("simulated", move |work: BatchWork| async move {
            tracing::debug!(
                "Simulating downstream call for batch {} ({} ids)",
                work.batch_id.0,
                work.ids.len()
            );
            tokio::time::sleep(delay).await;
            Ok(())
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs one attempt to completion.
    ///
    /// The closure runs on its own task so a panic surfaces as an `Err` here
    /// instead of unwinding through the scheduler loop.
    pub async fn execute(&self, work: BatchWork) -> Result<()> {
        let future = (self.work)(work);
        match tokio::spawn(future).await {
            Ok(result) => result,
            Err(join_error) if join_error.is_panic() => {
                Err(anyhow::anyhow!("worker '{}' panicked", self.name))
            }
            Err(join_error) => Err(anyhow::anyhow!(
                "worker '{}' was cancelled: {}",
                self.name,
                join_error
            )),
        }
    }
}

impl std::fmt::Debug for BatchWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchWorker").field("name", &self.name).finish()
    }
}
