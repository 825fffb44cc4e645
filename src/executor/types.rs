use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Unique identifier for a batch.
///
/// Wrapper around a UUID string, assigned once when the batch is cut from a submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BatchId(pub String);

impl BatchId {
    /// Generates a new random UUID v4-based BatchId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

/// Priority tag carried by a submission and every batch cut from it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Primary sort key of the scheduler queue. Lower rank is dequeued first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// Lifecycle state of a batch.
///
/// Moves forward only: `YetToStart -> Triggered -> Completed | Failed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Waiting in the scheduler queue.
    YetToStart,
    /// Dequeued at least once. Stays here while a failed attempt waits for a retry.
    Triggered,
    /// Unit of work finished successfully.
    Completed,
    /// Every attempt failed; the last error is kept on the batch.
    Failed,
}

impl BatchStatus {
    fn stage(self) -> u8 {
        match self {
            BatchStatus::YetToStart => 0,
            BatchStatus::Triggered => 1,
            BatchStatus::Completed | BatchStatus::Failed => 2,
        }
    }

    /// True once the batch can no longer change.
    pub fn is_terminal(self) -> bool {
        self.stage() == 2
    }

    /// Whether moving from `self` to `next` keeps the lifecycle monotonic.
    pub fn can_advance_to(self, next: BatchStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        next.stage() >= self.stage()
    }
}

/// Mutable part of a batch. Only the scheduler writes it.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchState {
    pub status: BatchStatus,
    /// Number of times the unit of work has been started.
    pub attempts: u32,
    pub last_error: Option<String>,
}

/// A bounded chunk of ids from one submission, processed as one unit.
///
/// Identity and payload are immutable; the state is shared between the
/// ingestion store (reader) and the scheduler (sole writer).
#[derive(Debug)]
pub struct Batch {
    pub batch_id: BatchId,
    pub ids: Vec<u64>,
    pub priority: Priority,
    /// Submission instant, shared by every batch of the same ingestion.
    pub created_at: Instant,
    state: RwLock<BatchState>,
}

impl Batch {
    pub fn new(ids: Vec<u64>, priority: Priority, created_at: Instant) -> Self {
        Self {
            batch_id: BatchId::new(),
            ids,
            priority,
            created_at,
            state: RwLock::new(BatchState {
                status: BatchStatus::YetToStart,
                attempts: 0,
                last_error: None,
            }),
        }
    }

    pub async fn status(&self) -> BatchStatus {
        self.state.read().await.status
    }

    pub async fn snapshot(&self) -> BatchState {
        self.state.read().await.clone()
    }

    /// Marks the start of an attempt and returns its 1-based number.
    pub(crate) async fn begin_attempt(&self) -> u32 {
        let mut state = self.state.write().await;
        if state.status.can_advance_to(BatchStatus::Triggered) {
            state.status = BatchStatus::Triggered;
        }
        state.attempts += 1;
        state.attempts
    }

    pub(crate) async fn complete(&self) {
        let mut state = self.state.write().await;
        if state.status.can_advance_to(BatchStatus::Completed) {
            state.status = BatchStatus::Completed;
            state.last_error = None;
        }
    }

    /// Records a failed attempt without leaving `Triggered`.
    pub(crate) async fn record_failure(&self, error: String) {
        self.state.write().await.last_error = Some(error);
    }

    pub(crate) async fn fail(&self, error: String) {
        let mut state = self.state.write().await;
        if state.status.can_advance_to(BatchStatus::Failed) {
            state.status = BatchStatus::Failed;
            state.last_error = Some(error);
        }
    }
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
