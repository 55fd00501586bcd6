use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::models::AppState;

pub fn build_router(state: AppState) -> Router {
    let assets = Router::new()
        .route("/static/styles.css", get(handlers::stylesheet_get))
        .layer(ServiceBuilder::new().layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        )));

    Router::new()
        .route("/", get(handlers::root_get))
        .route("/refresh", post(handlers::refresh_post))
        .route("/instance/:instance_id", get(handlers::instance_detail))
        .route("/api/state", get(handlers::state_json))
        .route("/api/instances/:instance_id/samples", get(handlers::samples_json))
        .merge(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
