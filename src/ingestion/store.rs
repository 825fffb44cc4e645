//! In-Memory Ingestion Store
//!
//! Maps ingestion ids to their batches. The store holds the same `Arc<Batch>`
//! instances the scheduler queue holds, so a status query always sees the
//! scheduler's latest write without any message flowing back.
//!
//! Entries are never removed; state lives for the lifetime of the process.

use super::types::{Ingestion, IngestionId, StatusCounts};
use crate::executor::types::BatchStatus;

use dashmap::DashMap;
use std::sync::Arc;

pub struct IngestionStore {
    ingestions: DashMap<IngestionId, Arc<Ingestion>>,
}

impl IngestionStore {
    pub fn new() -> Self {
        Self {
            ingestions: DashMap::new(),
        }
    }

    pub fn insert(&self, ingestion: Ingestion) -> Arc<Ingestion> {
        let ingestion = Arc::new(ingestion);
        self.ingestions
            .insert(ingestion.ingestion_id.clone(), ingestion.clone());

        tracing::debug!(
            "Stored ingestion {} ({} batches)",
            ingestion.ingestion_id.0,
            ingestion.batches.len()
        );
        ingestion
    }

    pub fn get(&self, ingestion_id: &IngestionId) -> Option<Arc<Ingestion>> {
        self.ingestions
            .get(ingestion_id)
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.ingestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingestions.is_empty()
    }

    /// Counts every stored batch by its current status.
    pub async fn status_counts(&self) -> StatusCounts {
        // Collect first so no shard lock is held across an await.
        let ingestions: Vec<Arc<Ingestion>> = self
            .ingestions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        let mut counts = StatusCounts::default();
        for ingestion in ingestions {
            for batch in &ingestion.batches {
                counts.record(batch.status().await);
            }
        }
        counts
    }
}

impl Default for IngestionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Folds batch statuses into the status of their ingestion.
///
/// - `Completed` when every batch completed.
/// - `Failed` when every batch is terminal and at least one failed.
/// - `Triggered` when any batch is currently `Triggered`.
/// - `YetToStart` otherwise, even if some batches already finished.
pub fn overall_status(statuses: &[BatchStatus]) -> BatchStatus {
    if statuses.iter().all(|s| *s == BatchStatus::Completed) {
        BatchStatus::Completed
    } else if statuses.iter().all(|s| s.is_terminal()) {
        BatchStatus::Failed
    } else if statuses.contains(&BatchStatus::Triggered) {
        BatchStatus::Triggered
    } else {
        BatchStatus::YetToStart
    }
}
