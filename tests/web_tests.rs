use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use infradash::api::{FetchError, Fetcher};
use infradash::models::{AppState, FieldMapping};
use infradash::routes::build_router;
use infradash::services::PollingController;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Always returns the same result, after an optional delay.
struct FixedFetcher {
    response: Result<Value, FetchError>,
    latency: Duration,
    calls: AtomicUsize,
}

#[async_trait]
impl Fetcher for FixedFetcher {
    fn endpoint(&self) -> &str {
        "http://metrics.test:5000/api/metrics"
    }

    async fn fetch(&self) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.response.clone()
    }
}

fn inventory() -> Value {
    json!([
        {
            "InstanceID": "i-1", "Name": "web-frontend", "State": "running", "Type": "t3.micro",
            "AZ": "us-east-1a", "PrivateIP": "10.0.0.1", "Owner": "platform",
            "CPUHistory": [10, 20, 15, 30, 25, 40, 35]
        },
        {"InstanceID": "i-2", "Name": "batch", "State": "stopped"}
    ])
}

fn setup(response: Result<Value, FetchError>) -> (Arc<FixedFetcher>, Arc<PollingController>, AppState) {
    setup_with_latency(response, Duration::ZERO)
}

fn setup_with_latency(
    response: Result<Value, FetchError>,
    latency: Duration,
) -> (Arc<FixedFetcher>, Arc<PollingController>, AppState) {
    let fetcher = Arc::new(FixedFetcher {
        response,
        latency,
        calls: AtomicUsize::new(0),
    });
    let controller = Arc::new(PollingController::new(fetcher.clone(), FieldMapping::default()));
    let state = AppState::new(Arc::clone(&controller), 1, Duration::from_secs(30));
    (fetcher, controller, state)
}

async fn send(app: Router, method: &str, uri: &str) -> Response {
    app.oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_dashboard_before_first_poll() {
    let (_, _, state) = setup(Ok(inventory()));

    let response = send(build_router(state), "GET", "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("No data found."));
    assert!(html.contains("Last Update: N/A"));
    assert!(html.contains("metrics.test:5000"));
    assert!(html.contains(r#"content="30""#));
}

#[tokio::test]
async fn test_dashboard_lists_instances() {
    let (_, controller, state) = setup(Ok(inventory()));
    controller.poll(1).await;

    let html = body_text(send(build_router(state), "GET", "/").await).await;
    assert!(html.contains("web-frontend"));
    assert!(html.contains("i-2"));
    assert!(html.contains("badge-running"));
    assert!(html.contains("badge-stopped"));
    assert!(html.contains("Running"));
    assert!(!html.contains("No data found."));
    assert!(!html.contains("Last Update: N/A"));
}

#[tokio::test]
async fn test_dashboard_shows_error_without_data() {
    let (_, controller, state) = setup(Err(FetchError::Status(502)));
    controller.poll(1).await;

    let html = body_text(send(build_router(state), "GET", "/").await).await;
    assert!(html.contains("Failed to reach the backend"));
    assert!(html.contains("banner-error"));
    assert!(!html.contains("No data found."));
}

#[tokio::test]
async fn test_instance_detail_with_history() {
    let (_, controller, state) = setup(Ok(inventory()));
    controller.poll(1).await;

    let response = send(build_router(state), "GET", "/instance/i-1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("7-Day Avg CPU Usage"));
    assert!(html.contains("<svg"));
    assert!(html.contains("#6366f1"));
    assert!(html.contains("us-east-1a"));
    assert!(html.contains("35.0%"));
}

#[tokio::test]
async fn test_instance_detail_without_history() {
    let (_, controller, state) = setup(Ok(inventory()));
    controller.poll(1).await;

    let html = body_text(send(build_router(state), "GET", "/instance/i-2").await).await;
    assert!(html.contains("No CPU history available."));
    assert!(!html.contains("<svg"));
}

#[tokio::test]
async fn test_detail_link_survives_reserved_characters() {
    let (_, controller, state) = setup(Ok(json!([
        {"InstanceID": "db/primary #1", "Name": "db", "State": "running"}
    ])));
    controller.poll(1).await;
    let app = build_router(state);

    let html = body_text(send(app.clone(), "GET", "/").await).await;
    assert!(html.contains(r#"href="/instance/db%2Fprimary%20%231""#));

    let response = send(app, "GET", "/instance/db%2Fprimary%20%231").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No CPU history available."));
}

#[tokio::test]
async fn test_unknown_instance_redirects_home() {
    let (_, controller, state) = setup(Ok(inventory()));
    controller.poll(1).await;

    let response = send(build_router(state), "GET", "/instance/i-404").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn test_refresh_polls_and_redirects() {
    let (fetcher, controller, state) = setup(Ok(inventory()));

    let response = send(build_router(state), "POST", "/refresh").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.state().records().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_completes_after_client_disconnects() {
    let (fetcher, controller, state) = setup_with_latency(Ok(inventory()), Duration::from_secs(5));

    let cut_short = tokio::time::timeout(Duration::from_secs(1), send(build_router(state), "POST", "/refresh")).await;
    assert!(cut_short.is_err());
    assert!(controller.state().is_loading());

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(controller.state().status_name(), "success");
    assert_eq!(controller.state().records().len(), 2);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_state_json() {
    let (_, controller, state) = setup(Ok(inventory()));
    let app = build_router(state);

    let idle: Value = serde_json::from_str(&body_text(send(app.clone(), "GET", "/api/state").await).await).unwrap();
    assert_eq!(idle["status"], "idle");

    controller.poll(1).await;
    let success: Value = serde_json::from_str(&body_text(send(app, "GET", "/api/state").await).await).unwrap();
    assert_eq!(success["status"], "success");
    assert_eq!(success["records"].as_array().map(Vec::len), Some(2));
    assert_eq!(success["records"][0]["state"], "running");
}

#[tokio::test]
async fn test_samples_json() {
    let (_, controller, state) = setup(Ok(inventory()));
    controller.poll(1).await;
    let app = build_router(state);

    let response = send(app.clone(), "GET", "/api/instances/i-1/samples").await;
    assert_eq!(response.status(), StatusCode::OK);
    let samples: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let samples = samples.as_array().unwrap();
    assert_eq!(samples.len(), 7);
    assert_eq!(samples[6]["value"], 35.0);

    let missing = send(app, "GET", "/api/instances/i-404/samples").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_str(&body_text(missing).await).unwrap();
    assert_eq!(body["error"], "Instance with ID i-404 not found");
}

#[tokio::test]
async fn test_stylesheet_default_and_custom() {
    let (_, _, state) = setup(Ok(inventory()));

    let response = send(build_router(state.clone()), "GET", "/static/styles.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");
    assert!(response.headers().contains_key(header::CACHE_CONTROL));
    assert!(body_text(response).await.contains(".badge-running"));

    let mut custom = state;
    custom.custom_css = Some("body { color: red; }".into());
    let css = body_text(send(build_router(custom), "GET", "/static/styles.css").await).await;
    assert_eq!(css, "body { color: red; }");
}

#[tokio::test]
async fn test_lowercase_payload_end_to_end() {
    let (_, controller, state) = setup(Ok(json!([{
        "id": "i-1", "name": "web-1", "state": "running", "type": "t3.micro",
        "cpuHistory": [10, 20, 15, 30, 25, 40, 35]
    }])));
    controller.poll(3).await;
    let app = build_router(state);

    let html = body_text(send(app.clone(), "GET", "/").await).await;
    assert!(html.contains(r#"title="web-1 &#x2f; i-1""#) || html.contains(r#"title="web-1 / i-1""#));
    assert_eq!(html.matches(r#"<tr class="row">"#).count(), 1);
    assert!(html.contains("badge-running"));

    let detail = body_text(send(app, "GET", "/instance/i-1").await).await;
    assert!(detail.contains(r#"class="line""#));
    assert_eq!(detail.matches("<circle").count(), 7);
}
