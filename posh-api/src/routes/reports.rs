//! Compliance report endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use posh_engine::ComplianceReport;

use crate::dto::ReportQueryParams;
use crate::error::ApiResult;
use crate::state::AppState;

/// Generate the compliance report for a date window
pub async fn compliance_report(
    State(state): State<AppState>,
    Query(params): Query<ReportQueryParams>,
) -> ApiResult<Json<ComplianceReport>> {
    let report = state.reporter.generate(params.start, params.end).await?;
    Ok(Json(report))
}
