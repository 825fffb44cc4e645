//! Ingestion Service
//!
//! The two operations the HTTP layer calls into:
//! - **`submit`**: validates a whole id list, cuts it into batches, hands them
//!   to the scheduler and records the ingestion.
//! - **`get_status`**: reads the live batch states and folds them into an
//!   overall status.

use super::protocol::{BatchStatusView, IngestionStatusResponse, StatsResponse};
use super::store::{overall_status, IngestionStore};
use super::types::{BatchingConfig, Ingestion, IngestionId};
use crate::error::IngestError;
use crate::executor::scheduler::SchedulerHandle;
use crate::executor::types::{now_ms, Batch, Priority};

use std::sync::Arc;
use tokio::time::Instant;

pub struct IngestionService {
    store: IngestionStore,
    scheduler: SchedulerHandle,
    batching: BatchingConfig,
}

impl IngestionService {
    pub fn new(scheduler: SchedulerHandle, batching: BatchingConfig) -> Self {
        Self {
            store: IngestionStore::new(),
            scheduler,
            batching,
        }
    }

    pub fn store(&self) -> &IngestionStore {
        &self.store
    }

    /// Accepts a submission and returns its ingestion id.
    ///
    /// Nothing is queued or stored unless every id is valid.
    pub fn submit(&self, ids: &[i64], priority: Priority) -> Result<IngestionId, IngestError> {
        let ids = validate_ids(ids, &self.batching)?;

        // One instant for the whole submission: its batches tie-break as a group.
        let created_at = Instant::now();
        let batches: Vec<Arc<Batch>> = split_into_chunks(&ids, self.batching.batch_size)
            .into_iter()
            .map(|chunk| Arc::new(Batch::new(chunk, priority, created_at)))
            .collect();

        self.scheduler.enqueue(batches.clone())?;

        let ingestion = self.store.insert(Ingestion {
            ingestion_id: IngestionId::new(),
            batches,
            created_at: now_ms(),
        });

        tracing::info!(
            "Accepted ingestion {} ({} ids, {} batches, priority {:?})",
            ingestion.ingestion_id.0,
            ids.len(),
            ingestion.batches.len(),
            priority
        );

        Ok(ingestion.ingestion_id.clone())
    }

    pub async fn get_status(
        &self,
        ingestion_id: &IngestionId,
    ) -> Result<IngestionStatusResponse, IngestError> {
        let ingestion = self
            .store
            .get(ingestion_id)
            .ok_or_else(|| IngestError::NotFound(ingestion_id.0.clone()))?;

        let mut views = Vec::with_capacity(ingestion.batches.len());
        for batch in &ingestion.batches {
            let state = batch.snapshot().await;
            views.push(BatchStatusView {
                batch_id: batch.batch_id.clone(),
                ids: batch.ids.clone(),
                status: state.status,
                error: state.last_error,
            });
        }

        // Derived from the same snapshot as the per-batch entries.
        let statuses: Vec<_> = views.iter().map(|view| view.status).collect();

        Ok(IngestionStatusResponse {
            ingestion_id: ingestion.ingestion_id.clone(),
            status: overall_status(&statuses),
            batches: views,
        })
    }

    pub async fn stats(&self) -> StatsResponse {
        StatsResponse {
            ingestions: self.store.len(),
            queued: self.scheduler.queued(),
            batches: self.store.status_counts().await,
        }
    }
}

/// Checks every id against the configured range before anything is created.
///
/// Fails on the first offending id, in request order.
pub fn validate_ids(ids: &[i64], batching: &BatchingConfig) -> Result<Vec<u64>, IngestError> {
    if ids.is_empty() {
        return Err(IngestError::EmptyRequest);
    }

    let mut valid = Vec::with_capacity(ids.len());
    for &id in ids {
        match u64::try_from(id) {
            Ok(value) if (batching.min_id..=batching.max_id).contains(&value) => valid.push(value),
            _ => {
                return Err(IngestError::Validation {
                    id,
                    min: batching.min_id,
                    max: batching.max_id,
                })
            }
        }
    }

    Ok(valid)
}

/// Cuts `ids` into consecutive chunks of at most `batch_size`, preserving order.
pub fn split_into_chunks(ids: &[u64], batch_size: usize) -> Vec<Vec<u64>> {
    ids.chunks(batch_size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}
