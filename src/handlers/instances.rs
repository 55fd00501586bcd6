use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;

use crate::chart::{self, svg, PlotArea};
use crate::models::AppState;
use crate::services::samples_for_record;
use crate::templates::InstanceDetailTemplate;

use super::helpers::{build_template_globals, render_template};

/// Detail panel for one instance of the current inventory. An id that is not
/// in the inventory goes back to the list.
pub async fn instance_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let snapshot = state.controller.state();
    let Some(record) = snapshot.inventory().and_then(|inv| inv.find(&id)) else {
        tracing::debug!(%id, "instance not in current inventory");
        return Redirect::to("/").into_response();
    };

    let samples = samples_for_record(record, Utc::now().date_naive());
    let chart_svg = chart::render(&samples, &PlotArea::default())
        .map(|c| svg::to_svg(&c))
        .unwrap_or_default();
    let rows = samples
        .iter()
        .map(|s| (s.timestamp.format("%Y-%m-%d").to_string(), format!("{:.1}%", s.value)))
        .collect();

    render_template(InstanceDetailTemplate {
        globals: build_template_globals(&snapshot, &state.api_url),
        instance_id: record.id.clone(),
        name: record.name.clone(),
        state_label: record.state.label(),
        badge_class: record.state.badge_class().to_string(),
        details: record.details(),
        has_chart: !chart_svg.is_empty(),
        chart_svg,
        samples: rows,
    })
}
