//! Workflow-automation callback endpoints
//!
//! The outbound dispatcher hands events to the automation service; these
//! endpoints are the return path for its results: AI analysis blobs, evidence
//! scores, external task references and delivery acknowledgements. Each
//! handler writes back into the store and answers a uniform
//! `{success: true, processed: "<endpoint>"}` acknowledgement.

use axum::{extract::State, Json};
use chrono::Utc;
use tracing::info;

use posh_core::types::{CaseId, DeadlineId, EvidenceId};
use posh_engine::CaseStore;

use crate::dto::{
    CallbackAck, CaseAnalysisCompleteRequest, DeadlineAlertSentRequest,
    EvidenceAnalysisCompleteRequest, InvestigationTaskCreatedRequest, NotificationSentRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// AI case analysis finished: store the blob and optional recomputed score
pub async fn case_analysis_complete(
    State(state): State<AppState>,
    Json(req): Json<CaseAnalysisCompleteRequest>,
) -> ApiResult<Json<CallbackAck>> {
    let case_id = CaseId(req.case_id);
    state
        .store
        .get_case(&case_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Case not found: {}", case_id)))?;

    state
        .store
        .update_case_analysis(&case_id, req.analysis, req.score)
        .await?;

    info!(case_id = %case_id, score = ?req.score, "Case analysis recorded");
    Ok(Json(CallbackAck::processed("case-analysis-complete")))
}

/// AI evidence analysis finished: stamp score and credibility on the row
pub async fn evidence_analysis_complete(
    State(state): State<AppState>,
    Json(req): Json<EvidenceAnalysisCompleteRequest>,
) -> ApiResult<Json<CallbackAck>> {
    if !(1..=5).contains(&req.credibility) {
        return Err(ApiError::Validation(format!(
            "Credibility must be 1-5, got {}",
            req.credibility
        )));
    }

    let evidence_id = EvidenceId(req.evidence_id);
    let updated = state
        .store
        .update_evidence_analysis(&evidence_id, req.ai_score, req.credibility)
        .await?;
    if !updated {
        return Err(ApiError::NotFound(format!(
            "Evidence not found: {}",
            evidence_id
        )));
    }

    info!(evidence_id = %evidence_id, score = req.ai_score, "Evidence analysis recorded");
    Ok(Json(CallbackAck::processed("evidence-analysis-complete")))
}

/// External investigation task created: append its reference to the case
pub async fn investigation_task_created(
    State(state): State<AppState>,
    Json(req): Json<InvestigationTaskCreatedRequest>,
) -> ApiResult<Json<CallbackAck>> {
    let case_id = CaseId(req.case_id);
    state
        .store
        .get_case(&case_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Case not found: {}", case_id)))?;

    state
        .store
        .append_case_metadata(
            &case_id,
            "investigation_task",
            serde_json::json!({
                "task_ref": req.task_ref,
                "task_url": req.task_url,
                "recorded_at": Utc::now(),
            }),
        )
        .await?;

    info!(case_id = %case_id, task_ref = %req.task_ref, "Investigation task recorded");
    Ok(Json(CallbackAck::processed("investigation-task-created")))
}

/// Deadline alert delivered externally: stamp the delivery time
pub async fn deadline_alert_sent(
    State(state): State<AppState>,
    Json(req): Json<DeadlineAlertSentRequest>,
) -> ApiResult<Json<CallbackAck>> {
    let deadline_id = DeadlineId(req.deadline_id);
    let at = req.sent_at.unwrap_or_else(Utc::now);

    let updated = state.store.set_alert_timestamp(&deadline_id, at).await?;
    if !updated {
        return Err(ApiError::NotFound(format!(
            "Deadline not found: {}",
            deadline_id
        )));
    }

    info!(deadline_id = %deadline_id, at = %at, "Alert delivery acknowledged");
    Ok(Json(CallbackAck::processed("deadline-alert-sent")))
}

/// External notification delivered: keep the record on the case
pub async fn notification_sent(
    State(state): State<AppState>,
    Json(req): Json<NotificationSentRequest>,
) -> ApiResult<Json<CallbackAck>> {
    if req.channel.trim().is_empty() {
        return Err(ApiError::Validation("Channel must not be empty".to_string()));
    }

    let record = serde_json::json!({
        "channel": req.channel.as_str(),
        "recipient": req.recipient.as_str(),
        "detail": req.detail,
        "recorded_at": Utc::now(),
    });

    match req.case_id {
        Some(case_id) => {
            let case_id = CaseId(case_id);
            state
                .store
                .get_case(&case_id)
                .await?
                .ok_or_else(|| ApiError::NotFound(format!("Case not found: {}", case_id)))?;
            state
                .store
                .append_case_metadata(&case_id, "last_notification", record)
                .await?;
            info!(case_id = %case_id, channel = %req.channel, "Notification recorded");
        }
        None => {
            info!(channel = %req.channel, recipient = %req.recipient, "Notification recorded without case");
        }
    }

    Ok(Json(CallbackAck::processed("notification-sent")))
}
