//! HTTP request handlers.

use super::AppState;
use crate::analytics::{
    build_owner_health, build_rollups, build_source_health, stale_sources, AnalysisWindow,
    SourceHealth, SummaryReport,
};
use crate::db::{CheckStatus, NewSource, StoreError};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let message: String = message.into();
    (status, Json(json!({ "error": message }))).into_response()
}

fn store_error(e: StoreError) -> Response {
    match e {
        StoreError::SourceNotFound(_) => error_response(StatusCode::NOT_FOUND, e.to_string()),
        other => {
            tracing::error!("API: store failure: {}", other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

// ============================================================================
// API: Sources
// ============================================================================

pub async fn handle_get_sources(State(state): State<AppState>) -> Response {
    match state.store.get_sources() {
        Ok(sources) => Json(sources).into_response(),
        Err(e) => store_error(e),
    }
}

pub async fn handle_create_source(
    State(state): State<AppState>,
    Json(req): Json<NewSource>,
) -> Response {
    let source = NewSource {
        name: req.name.trim().to_string(),
        owner: req.owner.trim().to_string(),
        sla_hours: req.sla_hours,
        notes: req
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
    };

    if source.name.is_empty() || source.owner.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "name and owner are required");
    }
    if source.sla_hours < 1 {
        return error_response(StatusCode::BAD_REQUEST, "sla_hours must be at least 1");
    }

    match state.store.add_source(&source, Utc::now()) {
        Ok(true) => (StatusCode::CREATED, Json(json!({ "name": source.name }))).into_response(),
        Ok(false) => error_response(
            StatusCode::CONFLICT,
            format!("Source '{}' already exists", source.name),
        ),
        Err(e) => store_error(e),
    }
}

pub async fn handle_delete_source(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    match state.store.remove_source(&name) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => store_error(StoreError::SourceNotFound(name)),
        Err(e) => store_error(e),
    }
}

// ============================================================================
// API: Checks
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

pub async fn handle_get_checks(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(state.config.history_limit);
    if limit < 1 {
        return error_response(StatusCode::BAD_REQUEST, "limit must be at least 1");
    }

    match state.store.get_source_history(&name, limit) {
        Ok(checks) => Json(checks).into_response(),
        Err(e) => store_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct LogCheckRequest {
    pub status: String,
    #[serde(default)]
    pub details: Option<String>,
}

pub async fn handle_log_check(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<LogCheckRequest>,
) -> Response {
    let status: CheckStatus = match req.status.parse() {
        Ok(status) => status,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let details = req.details.as_deref().map(str::trim).filter(|d| !d.is_empty());

    match state.store.log_check(&name, status, details, Utc::now()) {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(e) => store_error(e),
    }
}

// ============================================================================
// API: Reports
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    #[serde(default)]
    pub days: Option<i64>,
}

fn load_health(state: &AppState, query: &WindowQuery) -> Result<(AnalysisWindow, Vec<SourceHealth>), Response> {
    let days = query.days.unwrap_or(state.config.window_days);
    if days < 1 {
        return Err(error_response(StatusCode::BAD_REQUEST, "days must be at least 1"));
    }

    let window = AnalysisWindow::new(days, Utc::now());
    let sources = state.store.get_sources().map_err(store_error)?;
    let history = state.store.get_check_history().map_err(store_error)?;
    Ok((window, build_source_health(&sources, &history, &window)))
}

pub async fn handle_source_health(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Response {
    match load_health(&state, &query) {
        Ok((_, health)) => Json(health).into_response(),
        Err(response) => response,
    }
}

pub async fn handle_owner_health(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Response {
    match load_health(&state, &query) {
        Ok((_, health)) => Json(build_owner_health(&health)).into_response(),
        Err(response) => response,
    }
}

pub async fn handle_stale(State(state): State<AppState>) -> Response {
    match load_health(&state, &WindowQuery { days: None }) {
        Ok((_, health)) => Json(stale_sources(&health)).into_response(),
        Err(response) => response,
    }
}

pub async fn handle_summary(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Response {
    match load_health(&state, &query) {
        Ok((window, health)) => Json(SummaryReport::from_health(window.days, &health)).into_response(),
        Err(response) => response,
    }
}

pub async fn handle_rollup(State(state): State<AppState>) -> Response {
    let sources = match state.store.get_sources() {
        Ok(s) => s,
        Err(e) => return store_error(e),
    };
    let history = match state.store.get_check_history() {
        Ok(h) => h,
        Err(e) => return store_error(e),
    };

    Json(build_rollups(&sources, &history, Utc::now())).into_response()
}
