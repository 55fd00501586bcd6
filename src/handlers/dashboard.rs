use std::sync::Arc;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Redirect, Response};

use crate::models::AppState;
use crate::templates::DashboardTemplate;

use super::helpers::{build_template_globals, render_template};

const DEFAULT_STYLESHEET: &str = include_str!("../../static/styles.css");

pub async fn root_get(State(state): State<AppState>) -> Response {
    let snapshot = state.controller.state();
    let globals = build_template_globals(&snapshot, &state.api_url);
    render_template(DashboardTemplate {
        globals,
        records: snapshot.records(),
        refresh_secs: state.refresh_secs,
    })
}

/// Manual refresh: runs a full retrying poll, then shows the dashboard.
/// The poll runs on its own task so a client that goes away mid-refresh
/// does not cut it short.
pub async fn refresh_post(State(state): State<AppState>) -> Redirect {
    let controller = Arc::clone(&state.controller);
    let max_attempts = state.max_attempts;
    match tokio::spawn(async move { controller.poll(max_attempts).await }).await {
        Ok(outcome) => tracing::info!(status = outcome.status_name(), "manual refresh finished"),
        Err(e) => tracing::error!(error = %e, "manual refresh task failed"),
    }
    Redirect::to("/")
}

pub async fn stylesheet_get(State(state): State<AppState>) -> Response {
    let body = state
        .custom_css
        .as_deref()
        .unwrap_or(DEFAULT_STYLESHEET)
        .to_string();
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], body).into_response()
}
