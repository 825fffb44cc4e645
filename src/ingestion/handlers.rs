use super::protocol::*;
use super::service::IngestionService;
use super::types::IngestionId;
use crate::error::ApiError;

use axum::{
    extract::{rejection::JsonRejection, Path},
    Extension, Json,
};
use std::sync::Arc;

pub async fn handle_ingest(
    Extension(service): Extension<Arc<IngestionService>>,
    payload: Result<Json<IngestRequest>, JsonRejection>,
) -> Result<Json<IngestResponse>, ApiError> {
    // Wrong types or an unknown priority are client errors like an out-of-range id.
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!("Rejected ingest body: {}", rejection.body_text());
        ApiError::ValidationError(rejection.body_text())
    })?;

    match service.submit(&req.ids, req.priority) {
        Ok(ingestion_id) => Ok(Json(IngestResponse { ingestion_id })),
        Err(e) => {
            tracing::warn!("Rejected ingestion: {}", e);
            Err(e.into())
        }
    }
}

pub async fn handle_get_status(
    Extension(service): Extension<Arc<IngestionService>>,
    Path(ingestion_id): Path<String>,
) -> Result<Json<IngestionStatusResponse>, ApiError> {
    let ingestion_id = IngestionId(ingestion_id);

    let status = service.get_status(&ingestion_id).await?;
    tracing::debug!("Status query: {} -> {:?}", ingestion_id.0, status.status);

    Ok(Json(status))
}

pub async fn handle_stats(
    Extension(service): Extension<Arc<IngestionService>>,
) -> Json<StatsResponse> {
    Json(service.stats().await)
}

pub async fn handle_health() -> &'static str {
    "ok"
}
