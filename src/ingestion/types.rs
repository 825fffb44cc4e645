//! Ingestion Data Types
//!
//! The record kept for every accepted submission and the per-request settings
//! that govern how a submission is validated and cut into batches.

use crate::executor::types::{Batch, BatchStatus};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique identifier handed back to the client on submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct IngestionId(pub String);

impl IngestionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for IngestionId {
    fn default() -> Self {
        Self::new()
    }
}

/// An accepted submission.
///
/// The batch list is fixed at creation; only the state inside each batch changes.
#[derive(Debug)]
pub struct Ingestion {
    pub ingestion_id: IngestionId,
    pub batches: Vec<Arc<Batch>>,
    /// Wall-clock submission time (ms since the Unix epoch).
    pub created_at: u64,
}

/// How submissions are validated and split.
#[derive(Debug, Clone)]
pub struct BatchingConfig {
    /// Maximum ids per batch. Always at least 1.
    pub batch_size: usize,
    /// Inclusive lower bound of a valid id.
    pub min_id: u64,
    /// Inclusive upper bound of a valid id.
    pub max_id: u64,
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            min_id: 1,
            max_id: 1_000_000_007,
        }
    }
}

/// Per-status batch counts across the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub yet_to_start: usize,
    pub triggered: usize,
    pub completed: usize,
    pub failed: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: BatchStatus) {
        match status {
            BatchStatus::YetToStart => self.yet_to_start += 1,
            BatchStatus::Triggered => self.triggered += 1,
            BatchStatus::Completed => self.completed += 1,
            BatchStatus::Failed => self.failed += 1,
        }
    }
}
