//! Health check endpoints

use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use posh_engine::CaseStore;

use crate::dto::HealthResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        monitor_running: state.monitor.is_running(),
    }))
}

/// Ready check endpoint (verifies store connectivity)
pub async fn ready_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let now = Utc::now();
    let store_ok = state
        .store
        .list_cases_created_between(now - Duration::minutes(1), now)
        .await
        .is_ok();

    let status = if store_ok { "ready" } else { "degraded" };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: state.version.clone(),
        monitor_running: state.monitor.is_running(),
    }))
}
