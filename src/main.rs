use ingestion_scheduler::app::App;
use ingestion_scheduler::config::get_config;
use ingestion_scheduler::executor::worker::BatchWorker;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const STATS_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = get_config()?;

    // `--bind <addr:port>` wins over the config file and environment.
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                let addr = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow::anyhow!("--bind requires an address"))?;
                config.http_addr = addr.clone();
                i += 2;
            }
            other => {
                tracing::warn!("Ignoring unknown argument: {}", other);
                i += 1;
            }
        }
    }

    let http_addr: SocketAddr = config.http_addr.parse()?;

    tracing::info!(
        "Batch size {}, rate limit {}ms, valid ids [{}, {}]",
        config.batch_size,
        config.rate_limit_ms,
        config.min_id,
        config.max_id
    );

    // 1. Scheduler + router:
    let app = App::build(&config, BatchWorker::simulated(config.work_duration()));

    // 2. Spawn stats reporter:
    let stats_service = Arc::clone(&app.service);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATS_INTERVAL);

        loop {
            interval.tick().await;
            let stats = stats_service.stats().await;
            tracing::info!(
                "Ingestions: {}, queued: {}, yet_to_start: {}, triggered: {}, completed: {}, failed: {}",
                stats.ingestions,
                stats.queued,
                stats.batches.yet_to_start,
                stats.batches.triggered,
                stats.batches.completed,
                stats.batches.failed
            );
        }
    });

    // 3. Start HTTP server:
    tracing::info!("HTTP server listening on {}", http_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    axum::serve(listener, app.router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
