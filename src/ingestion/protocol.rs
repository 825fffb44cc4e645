//! HTTP Protocol Definitions
//!
//! Request and response bodies of the public API, and the routes they travel on.

use super::types::{IngestionId, StatusCounts};
use crate::executor::types::{BatchId, BatchStatus, Priority};

use serde::{Deserialize, Serialize};

pub const ENDPOINT_INGEST: &str = "/ingest";
pub const ENDPOINT_STATUS: &str = "/status/{ingestion_id}";
pub const ENDPOINT_STATS: &str = "/stats";
pub const ENDPOINT_HEALTH: &str = "/health";

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Signed so that zero and negative values reach range validation.
    pub ids: Vec<i64>,
    pub priority: Priority,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub ingestion_id: IngestionId,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchStatusView {
    pub batch_id: BatchId,
    pub ids: Vec<u64>,
    pub status: BatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestionStatusResponse {
    pub ingestion_id: IngestionId,
    pub status: BatchStatus,
    pub batches: Vec<BatchStatusView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub ingestions: usize,
    /// Batches waiting in the scheduler queue right now.
    pub queued: usize,
    #[serde(flatten)]
    pub batches: StatusCounts,
}
