//! API route handlers

pub mod callbacks;
pub mod cases;
pub mod health;
pub mod reports;

use axum::{routing::get, routing::post, Router};

use crate::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        // Case endpoints
        .route("/cases", post(cases::create_case))
        .route("/cases/:case_id", get(cases::get_case))
        .route("/cases/:case_id/status", post(cases::update_status))
        .route("/cases/:case_id/evidence", post(cases::add_evidence))
        .route("/cases/:case_id/evidence", get(cases::list_evidence))
        .route("/cases/:case_id/reviews", post(cases::submit_review))
        .route("/cases/:case_id/reviews", get(cases::list_reviews))
        .route("/cases/:case_id/deadlines", get(cases::list_deadlines))
        // Deadline projections
        .route("/deadlines/overdue", get(cases::list_overdue_deadlines))
        // Reports
        .route("/reports/compliance", get(reports::compliance_report))
        // Workflow-automation callbacks
        .route(
            "/callbacks/case-analysis-complete",
            post(callbacks::case_analysis_complete),
        )
        .route(
            "/callbacks/evidence-analysis-complete",
            post(callbacks::evidence_analysis_complete),
        )
        .route(
            "/callbacks/investigation-task-created",
            post(callbacks::investigation_task_created),
        )
        .route(
            "/callbacks/deadline-alert-sent",
            post(callbacks::deadline_alert_sent),
        )
        .route(
            "/callbacks/notification-sent",
            post(callbacks::notification_sent),
        )
        // State
        .with_state(state)
}
