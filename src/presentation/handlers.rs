// HTTP request handlers
use crate::domain::view::{TabSummary, TabView};
use crate::infrastructure::html_page::{render_not_found, render_page};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct TabQuery {
    pub tab: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Render the selected tab (or the first one) as HTML
pub async fn dashboard_page(
    Query(query): Query<TabQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let service = &state.dashboard_service;
    let tabs = service.tabs();

    let Some(tab_id) = query
        .tab
        .as_deref()
        .or_else(|| service.default_tab_id())
        .map(str::to_string)
    else {
        return (StatusCode::NOT_FOUND, "no tabs configured").into_response();
    };

    let today = (state.today)();
    match service.render_tab(&tab_id, today).await {
        Some(tab) => Html(render_page(&state.title, &tabs, &tab)).into_response(),
        None => {
            tracing::debug!(tab = %tab_id, "unknown tab requested");
            (
                StatusCode::NOT_FOUND,
                Html(render_not_found(&state.title, &tabs, &tab_id)),
            )
                .into_response()
        }
    }
}

/// List tab ids and titles
pub async fn list_tabs(State(state): State<Arc<AppState>>) -> Json<Vec<TabSummary>> {
    Json(state.dashboard_service.tabs())
}

/// Render one tab as JSON
pub async fn tab_view(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<TabView>, StatusCode> {
    let today = (state.today)();
    state
        .dashboard_service
        .render_tab(&id, today)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Serve the latest image for an image section
pub async fn artifact_image(
    Path(section_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.dashboard_service.image(&section_id).await {
        Some((artifact, bytes)) => (
            [
                (header::CONTENT_TYPE, artifact.content_type()),
                (header::CACHE_CONTROL, "no-store"),
            ],
            bytes,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
