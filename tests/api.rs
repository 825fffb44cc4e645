// HTTP tests for the public API, served by the real router and scheduler.

use axum::http::StatusCode;
use axum_test::TestServer;
use ingestion_scheduler::app::App;
use ingestion_scheduler::config::AppConfig;
use ingestion_scheduler::executor::types::BatchStatus;
use ingestion_scheduler::executor::worker::BatchWorker;
use ingestion_scheduler::ingestion::protocol::{
    IngestResponse, IngestionStatusResponse, StatsResponse,
};
use serde_json::json;
use std::time::Duration;

fn fast_config() -> AppConfig {
    AppConfig {
        rate_limit_ms: 50,
        idle_poll_ms: 10,
        work_duration_ms: 10,
        ..AppConfig::default()
    }
}

fn setup_server(config: &AppConfig) -> TestServer {
    let app = App::build(config, BatchWorker::simulated(config.work_duration()));
    TestServer::new(app.router).expect("Failed to start test server")
}

async fn ingest(server: &TestServer, body: serde_json::Value) -> String {
    let response = server.post("/ingest").json(&body).await;
    response.assert_status_ok();
    response.json::<IngestResponse>().ingestion_id.0
}

async fn status(server: &TestServer, ingestion_id: &str) -> IngestionStatusResponse {
    let response = server.get(&format!("/status/{}", ingestion_id)).await;
    response.assert_status_ok();
    response.json::<IngestionStatusResponse>()
}

#[tokio::test]
async fn test_create_ingestion() {
    let server = setup_server(&AppConfig::default());

    let response = server
        .post("/ingest")
        .json(&json!({"ids": [1, 2, 3, 4, 5], "priority": "MEDIUM"}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["ingestion_id"].is_string());
}

#[tokio::test]
async fn test_invalid_id_range() {
    let server = setup_server(&AppConfig::default());

    for ids in [json!([0, 1, 2]), json!([1, 2, 1_000_000_008i64]), json!([-3])] {
        let response = server
            .post("/ingest")
            .json(&json!({"ids": ids, "priority": "MEDIUM"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("Invalid ID"));
    }

    let stats: StatsResponse = server.get("/stats").await.json();
    assert_eq!(stats.ingestions, 0);
    assert_eq!(stats.queued, 0);
}

#[tokio::test]
async fn test_error_names_offending_id() {
    let server = setup_server(&AppConfig::default());

    let response = server
        .post("/ingest")
        .json(&json!({"ids": [7, 1_000_000_008i64], "priority": "LOW"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("1000000008"));
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_malformed_requests_are_bad_requests() {
    let server = setup_server(&AppConfig::default());

    let unknown_priority = server
        .post("/ingest")
        .json(&json!({"ids": [1], "priority": "URGENT"}))
        .await;
    unknown_priority.assert_status(StatusCode::BAD_REQUEST);

    let wrong_type = server
        .post("/ingest")
        .json(&json!({"ids": ["one"], "priority": "HIGH"}))
        .await;
    wrong_type.assert_status(StatusCode::BAD_REQUEST);

    let empty = server
        .post("/ingest")
        .json(&json!({"ids": [], "priority": "HIGH"}))
        .await;
    empty.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_endpoint() {
    let server = setup_server(&AppConfig::default());
    let ingestion_id = ingest(&server, json!({"ids": [1, 2, 3], "priority": "MEDIUM"})).await;

    let body = status(&server, &ingestion_id).await;

    assert_eq!(body.ingestion_id.0, ingestion_id);
    assert!(matches!(
        body.status,
        BatchStatus::YetToStart | BatchStatus::Triggered
    ));

    let missing = server.get("/status/nonexistent").await;
    missing.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_batch_size_limit() {
    let server = setup_server(&AppConfig::default());
    let ingestion_id = ingest(
        &server,
        json!({"ids": [1, 2, 3, 4, 5, 6, 7, 8, 9], "priority": "MEDIUM"}),
    )
    .await;

    let body = status(&server, &ingestion_id).await;

    let ids: Vec<Vec<u64>> = body.batches.iter().map(|b| b.ids.clone()).collect();
    assert_eq!(ids, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]);
}

#[tokio::test]
async fn test_status_wire_format() {
    let server = setup_server(&AppConfig::default());
    let ingestion_id = ingest(&server, json!({"ids": [42], "priority": "HIGH"})).await;

    let body: serde_json::Value = server
        .get(&format!("/status/{}", ingestion_id))
        .await
        .json();

    assert_eq!(body["ingestion_id"], ingestion_id);
    assert!(body["status"].is_string());
    let batch = &body["batches"][0];
    assert!(batch["batch_id"].is_string());
    assert_eq!(batch["ids"], json!([42]));
    assert!(batch.get("error").is_none());
}

#[tokio::test]
async fn test_ingestion_runs_to_completion() {
    let config = fast_config();
    let server = setup_server(&config);
    let ingestion_id = ingest(&server, json!({"ids": [1, 2, 3, 4, 5], "priority": "LOW"})).await;

    let mut last = BatchStatus::YetToStart;
    for _ in 0..100 {
        last = status(&server, &ingestion_id).await.status;
        if last == BatchStatus::Completed {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(last, BatchStatus::Completed);
    let body = status(&server, &ingestion_id).await;
    assert!(body
        .batches
        .iter()
        .all(|b| b.status == BatchStatus::Completed));

    let stats: StatsResponse = server.get("/stats").await.json();
    assert_eq!(stats.batches.completed, 2);
    assert_eq!(stats.queued, 0);
}

#[tokio::test]
async fn test_health() {
    let server = setup_server(&AppConfig::default());

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("ok");
}
