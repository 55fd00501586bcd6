//! Stand-in metrics backend serving a fixed inventory from a JSON file.
//! Useful for running the dashboard without cloud credentials.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::models::{Field, FieldMapping};

#[derive(Clone)]
pub struct MockData {
    items: Arc<Vec<Value>>,
    mapping: Arc<FieldMapping>,
}

impl MockData {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items: Arc::new(items),
            mapping: Arc::new(FieldMapping::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Value> {
        self.items.iter().find(|item| {
            item.as_object()
                .and_then(|obj| self.mapping.lookup(obj, Field::Id))
                .and_then(|v| v.as_str())
                == Some(id)
        })
    }
}

/// Read the inventory file. A missing or unparsable file is logged and
/// served as an empty list.
pub async fn load_mock_data(path: impl AsRef<Path>) -> MockData {
    let path = path.as_ref();
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(path = %path.display(), %e, "mock data file not readable; serving an empty list");
            return MockData::new(Vec::new());
        }
    };
    match serde_json::from_str::<Vec<Value>>(&raw) {
        Ok(items) => {
            tracing::info!(path = %path.display(), count = items.len(), "loaded mock data");
            MockData::new(items)
        }
        Err(e) => {
            tracing::error!(path = %path.display(), %e, "could not parse mock data; serving an empty list");
            MockData::new(Vec::new())
        }
    }
}

async fn metrics_get(State(data): State<MockData>) -> Json<Value> {
    Json(Value::Array(data.items.as_ref().clone()))
}

async fn metric_get(State(data): State<MockData>, UrlPath(id): UrlPath<String>) -> Response {
    match data.find(&id) {
        Some(item) => Json(item.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Instance with ID {} not found", id) })),
        )
            .into_response(),
    }
}

pub fn mock_router(data: MockData) -> Router {
    Router::new()
        .route("/api/metrics", get(metrics_get))
        .route("/api/metrics/:instance_id", get(metric_get))
        .layer(TraceLayer::new_for_http())
        .with_state(data)
}
