//! Rate-Limited Batch Scheduler
//!
//! A single long-lived task that owns the batch queue and the instant of the
//! last batch start. Submissions reach it only through [`SchedulerHandle`], so
//! the queue and the rate-limit bookkeeping are never shared and need no lock.
//!
//! ## Loop
//! 1. Apply every pending enqueue message.
//! 2. If the queue is non-empty and at least `rate_limit` has passed since the
//!    last start, pop the minimum batch, record the start instant and run the
//!    unit of work to completion before looking at the queue again.
//! 3. Otherwise wait for whichever comes first: a new message, the instant the
//!    next start becomes eligible, or `idle_poll`.
//!
//! Exactly one batch starts per interval and batches never run concurrently.
//! A batch already popped is never preempted by a later, higher-priority push.

use super::queue::BatchQueue;
use super::types::Batch;
use super::worker::{BatchWork, BatchWorker};
use crate::error::IngestError;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Tunables of the scheduler loop.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Minimum time between two consecutive batch starts.
    pub rate_limit: Duration,
    /// Upper bound of a single idle wait.
    pub idle_poll: Duration,
    /// Attempts per batch before it is marked `Failed`.
    pub max_attempts: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            rate_limit: Duration::from_secs(5),
            idle_poll: Duration::from_millis(100),
            max_attempts: 1,
        }
    }
}

enum SchedulerCommand {
    Enqueue(Vec<Arc<Batch>>),
}

/// Cloneable submission side of the scheduler.
#[derive(Clone)]
pub struct SchedulerHandle {
    tx: mpsc::UnboundedSender<SchedulerCommand>,
    queued: Arc<AtomicUsize>,
}

impl SchedulerHandle {
    /// Hands a submission's batches to the scheduler, in order.
    pub fn enqueue(&self, batches: Vec<Arc<Batch>>) -> Result<(), IngestError> {
        let count = batches.len();
        self.queued.fetch_add(count, Ordering::SeqCst);

        if self.tx.send(SchedulerCommand::Enqueue(batches)).is_err() {
            self.queued.fetch_sub(count, Ordering::SeqCst);
            return Err(IngestError::SchedulerUnavailable);
        }

        Ok(())
    }

    /// Batches accepted but not yet dequeued (retries included).
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }
}

pub struct BatchScheduler {
    config: SchedulerConfig,
    worker: BatchWorker,
    queue: BatchQueue,
    rx: mpsc::UnboundedReceiver<SchedulerCommand>,
    queued: Arc<AtomicUsize>,
    last_start: Option<Instant>,
    inbox_closed: bool,
}

impl BatchScheduler {
    /// Creates the scheduler and the handle used to feed it.
    pub fn new(config: SchedulerConfig, worker: BatchWorker) -> (Self, SchedulerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let queued = Arc::new(AtomicUsize::new(0));

        let scheduler = Self {
            config,
            worker,
            queue: BatchQueue::for_batches(),
            rx,
            queued: queued.clone(),
            last_start: None,
            inbox_closed: false,
        };

        (scheduler, SchedulerHandle { tx, queued })
    }

    /// Spawns the loop on the runtime and returns immediately.
    pub fn start(self) -> JoinHandle<()> {
        tracing::info!(
            "Starting batch scheduler (worker: {}, rate limit: {:?}, max attempts: {})",
            self.worker.name(),
            self.config.rate_limit,
            self.config.max_attempts
        );
        tokio::spawn(self.run())
    }

    /// Runs until every handle is dropped and the queue is drained.
    pub async fn run(mut self) {
        loop {
            self.drain_inbox();

            let now = Instant::now();
            if !self.queue.is_empty() && self.rate_limit_elapsed(now) {
                if let Some(batch) = self.queue.pop_min() {
                    self.queued.fetch_sub(1, Ordering::SeqCst);
                    self.last_start = Some(now);
                    self.process(batch).await;
                }
                continue;
            }

            if self.inbox_closed && self.queue.is_empty() {
                tracing::info!("All scheduler handles dropped, stopping batch scheduler");
                break;
            }

            let wake_at = self.next_wake(now);
            tokio::select! {
                command = self.rx.recv(), if !self.inbox_closed => match command {
                    Some(command) => self.apply(command),
                    None => self.inbox_closed = true,
                },
                _ = tokio::time::sleep_until(wake_at) => {}
            }
        }
    }

    fn drain_inbox(&mut self) {
        while !self.inbox_closed {
            match self.rx.try_recv() {
                Ok(command) => self.apply(command),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => self.inbox_closed = true,
            }
        }
    }

    fn apply(&mut self, command: SchedulerCommand) {
        match command {
            SchedulerCommand::Enqueue(batches) => {
                tracing::debug!("Queued {} batches", batches.len());
                for batch in batches {
                    self.queue.push(batch);
                }
            }
        }
    }

    fn rate_limit_elapsed(&self, now: Instant) -> bool {
        match self.last_start {
            Some(last) => now.duration_since(last) >= self.config.rate_limit,
            None => true,
        }
    }

    fn next_wake(&self, now: Instant) -> Instant {
        let poll_deadline = now + self.config.idle_poll;
        match (self.queue.is_empty(), self.last_start) {
            (false, Some(last)) => (last + self.config.rate_limit).min(poll_deadline),
            _ => poll_deadline,
        }
    }

    /// Drives one attempt of `batch` and settles its outcome.
    ///
    /// Never returns an error: a failed attempt is either re-queued with the
    /// batch's original ordering key or recorded as terminal.
    async fn process(&mut self, batch: Arc<Batch>) {
        let attempt = batch.begin_attempt().await;
        tracing::info!(
            "Batch {} triggered (priority: {:?}, ids: {}, attempt {}/{})",
            batch.batch_id.0,
            batch.priority,
            batch.ids.len(),
            attempt,
            self.config.max_attempts
        );

        let work = BatchWork {
            batch_id: batch.batch_id.clone(),
            ids: batch.ids.clone(),
            priority: batch.priority,
            attempt,
        };

        match self.worker.execute(work).await {
            Ok(()) => {
                batch.complete().await;
                tracing::info!("Batch {} completed", batch.batch_id.0);
            }
            Err(e) if attempt < self.config.max_attempts => {
                tracing::warn!(
                    "Batch {} failed on attempt {}, re-queueing: {}",
                    batch.batch_id.0,
                    attempt,
                    e
                );
                batch.record_failure(e.to_string()).await;
                self.queued.fetch_add(1, Ordering::SeqCst);
                self.queue.push(batch);
            }
            Err(e) => {
                tracing::error!(
                    "Batch {} failed after {} attempts: {}",
                    batch.batch_id.0,
                    attempt,
                    e
                );
                batch.fail(e.to_string()).await;
            }
        }
    }
}
