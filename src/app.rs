//! Service wiring shared by the binary and the integration tests.

use crate::config::AppConfig;
use crate::executor::scheduler::BatchScheduler;
use crate::executor::worker::BatchWorker;
use crate::ingestion::handlers::{handle_get_status, handle_health, handle_ingest, handle_stats};
use crate::ingestion::protocol::{ENDPOINT_HEALTH, ENDPOINT_INGEST, ENDPOINT_STATS, ENDPOINT_STATUS};
use crate::ingestion::service::IngestionService;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct App {
    pub router: Router,
    pub service: Arc<IngestionService>,
    /// The scheduler loop. Runs until the process exits.
    pub scheduler_task: JoinHandle<()>,
}

impl App {
    /// Starts the scheduler with `worker` and builds the HTTP router around it.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn build(config: &AppConfig, worker: BatchWorker) -> Self {
        let (scheduler, handle) = BatchScheduler::new(config.scheduler(), worker);
        let scheduler_task = scheduler.start();

        let service = Arc::new(IngestionService::new(handle, config.batching()));

        Self {
            router: router(service.clone()),
            service,
            scheduler_task,
        }
    }
}

pub fn router(service: Arc<IngestionService>) -> Router {
    Router::new()
        .route(ENDPOINT_INGEST, post(handle_ingest))
        .route(ENDPOINT_STATUS, get(handle_get_status))
        .route(ENDPOINT_STATS, get(handle_stats))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(Extension(service))
}
