use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::models::AppState;
use crate::services::samples_for_record;

/// Current poll state as JSON, tagged by `status`.
pub async fn state_json(State(state): State<AppState>) -> Response {
    Json(state.controller.state()).into_response()
}

pub async fn samples_json(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let snapshot = state.controller.state();
    match snapshot.inventory().and_then(|inv| inv.find(&id)) {
        Some(record) => Json(samples_for_record(record, Utc::now().date_naive())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Instance with ID {} not found", id) })),
        )
            .into_response(),
    }
}
