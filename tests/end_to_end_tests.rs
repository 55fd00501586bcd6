use infradash::api::{FetchError, Fetcher, HttpFetcher};
use infradash::mock_backend::{load_mock_data, mock_router, MockData};
use infradash::models::{FieldMapping, InstanceState, PollState};
use infradash::services::{Backoff, PollingController};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

async fn spawn_backend(data: MockData) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, mock_router(data)).await.unwrap();
    });
    addr
}

fn sample_items() -> Vec<Value> {
    vec![
        json!({
            "InstanceID": "i-0001", "Name": "web-1", "State": "running", "Type": "t3.micro",
            "AZ": "us-east-1a", "PrivateIP": "10.0.0.1", "Project": "shop", "Tenant": null,
            "Owner": "ops", "CPUHistory": [10, 20, 15, 30, 25, 40, 35]
        }),
        json!({"InstanceID": "i-0002", "Name": "", "State": "terminated"}),
    ]
}

fn fast_controller(url: String) -> Arc<PollingController> {
    infradash::api::set_silent(true);
    let fetcher = HttpFetcher::new(url, Duration::from_secs(5)).unwrap();
    Arc::new(
        PollingController::new(Arc::new(fetcher), FieldMapping::default())
            .with_backoff(Backoff::new(Duration::from_millis(1), Duration::from_millis(10))),
    )
}

#[tokio::test]
async fn test_poll_against_mock_backend() {
    let addr = spawn_backend(MockData::new(sample_items())).await;
    let controller = fast_controller(format!("http://{}/api/metrics", addr));

    let outcome = controller.poll(3).await;

    assert!(matches!(outcome, PollState::Success(_)), "{:?}", outcome);
    let records = outcome.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "i-0001");
    assert_eq!(records[0].state, InstanceState::Running);
    assert_eq!(records[0].tenant, "");
    assert_eq!(records[0].cpu_history.as_ref().map(Vec::len), Some(7));
    assert_eq!(records[1].name, "(no name)");
    assert_eq!(records[1].state, InstanceState::Terminated);
}

#[tokio::test]
async fn test_unreachable_path_fails_with_endpoint_in_message() {
    let addr = spawn_backend(MockData::new(sample_items())).await;
    let url = format!("http://{}/api/nothing-here", addr);
    let controller = fast_controller(url.clone());

    let outcome = controller.poll(3).await;

    let message = outcome.error_message().unwrap();
    assert!(message.contains(&url), "{}", message);
    assert!(outcome.records().is_empty());
    assert!(!controller.state().is_loading());
}

#[tokio::test]
async fn test_closed_port_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    infradash::api::set_silent(true);
    let fetcher = HttpFetcher::new(format!("http://{}/api/metrics", addr), Duration::from_secs(5)).unwrap();
    let err = fetcher.fetch().await.unwrap_err();
    assert_eq!(err.kind(), "transport");
}

#[tokio::test]
async fn test_status_and_payload_errors() {
    let addr = spawn_backend(MockData::new(sample_items())).await;
    infradash::api::set_silent(true);

    let missing = HttpFetcher::new(format!("http://{}/api/missing", addr), Duration::from_secs(5)).unwrap();
    assert_eq!(missing.fetch().await.unwrap_err(), FetchError::Status(404));

    // A single record is valid JSON but not an inventory list
    let single = HttpFetcher::new(format!("http://{}/api/metrics/i-0001", addr), Duration::from_secs(5)).unwrap();
    let body = single.fetch().await.unwrap();
    assert_eq!(body["Name"], "web-1");
    let err = infradash::api::parse_inventory(&body, &FieldMapping::default()).unwrap_err();
    assert_eq!(err.kind(), "payload");
}

#[tokio::test]
async fn test_mock_backend_single_record_routes() {
    let addr = spawn_backend(MockData::new(sample_items())).await;
    let client = reqwest::Client::new();

    let found = client.get(format!("http://{}/api/metrics/i-0002", addr)).send().await.unwrap();
    assert_eq!(found.status(), 200);
    let body: Value = found.json().await.unwrap();
    assert_eq!(body["State"], "terminated");

    let missing = client.get(format!("http://{}/api/metrics/i-9999", addr)).send().await.unwrap();
    assert_eq!(missing.status(), 404);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"], "Instance with ID i-9999 not found");
}

#[tokio::test]
async fn test_mock_backend_without_data_file_serves_empty_list() {
    let data = load_mock_data("does/not/exist.json").await;
    let addr = spawn_backend(data).await;
    let controller = fast_controller(format!("http://{}/api/metrics", addr));

    let outcome = controller.poll(1).await;

    assert!(matches!(outcome, PollState::Success(_)));
    assert!(outcome.records().is_empty());
}

#[tokio::test]
async fn test_mock_data_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.json");
    tokio::fs::write(&path, serde_json::to_string(&sample_items()).unwrap()).await.unwrap();

    let data = load_mock_data(&path).await;
    assert_eq!(data.len(), 2);
    let addr = spawn_backend(data).await;
    let controller = fast_controller(format!("http://{}/api/metrics", addr));

    let outcome = controller.poll(1).await;
    assert_eq!(outcome.records().len(), 2);
}
