use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::models::PollState;
use crate::templates::TemplateGlobals;

/// Format used for "Last Update" in the page header.
pub const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

pub fn format_last_update(state: &PollState) -> String {
    state
        .fetched_at()
        .map(|t| t.format(LAST_UPDATE_FORMAT).to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn build_template_globals(state: &PollState, api_url: &str) -> TemplateGlobals {
    let error_message = state.error_message().unwrap_or_default().to_string();
    TemplateGlobals {
        api_hostname: crate::utils::hostname_from_url(api_url),
        last_update: format_last_update(state),
        is_loading: state.is_loading(),
        has_error: !error_message.is_empty(),
        error_message,
    }
}

pub fn render_template<T: askama::Template>(t: T) -> Response {
    match t.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
