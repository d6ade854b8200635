//! Case lifecycle endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use posh_core::types::{CaseId, CaseStatus, EvidenceKind, ReviewPathway};
use posh_engine::{NewCaseInput, NewEvidenceInput};

use crate::dto::{
    CaseResponse, CreateCaseRequest, CreatedCaseResponse, DeadlineResponse, EvidenceItemRequest,
    EvidenceResponse, ReviewResponse, SubmitReviewRequest, UpdateStatusRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

fn parse_evidence_item(item: EvidenceItemRequest) -> ApiResult<NewEvidenceInput> {
    let kind = EvidenceKind::parse(&item.kind)
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    Ok(NewEvidenceInput {
        kind,
        description: item.description,
        file_ref: item.file_ref,
    })
}

/// File a new case
pub async fn create_case(
    State(state): State<AppState>,
    Json(req): Json<CreateCaseRequest>,
) -> ApiResult<Json<CreatedCaseResponse>> {
    let evidence = req
        .evidence
        .into_iter()
        .map(parse_evidence_item)
        .collect::<ApiResult<Vec<_>>>()?;

    let created = state
        .cases
        .create_case(NewCaseInput {
            title: req.title,
            description: req.description,
            complainant_name: req.complainant_name,
            respondent_name: req.respondent_name,
            evidence,
            metadata: req.metadata,
        })
        .await?;

    Ok(Json(CreatedCaseResponse {
        case: CaseResponse::from(&created.case),
        needs_human_review: created.needs_human_review,
        risk_level: created.risk_level.as_str().to_string(),
    }))
}

/// Get case by ID
pub async fn get_case(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> ApiResult<Json<CaseResponse>> {
    let case = state.cases.get_case(&CaseId(case_id)).await?;
    Ok(Json(CaseResponse::from(&case)))
}

/// Update case status
pub async fn update_status(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<CaseResponse>> {
    let status =
        CaseStatus::parse(&req.status).map_err(|e| ApiError::Validation(e.to_string()))?;

    let case = state
        .cases
        .update_status(&CaseId(case_id), status, req.assignee)
        .await?;
    Ok(Json(CaseResponse::from(&case)))
}

/// Attach a new evidence item
pub async fn add_evidence(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(req): Json<EvidenceItemRequest>,
) -> ApiResult<Json<EvidenceResponse>> {
    let input = parse_evidence_item(req)?;
    let evidence = state.cases.add_evidence(&CaseId(case_id), input).await?;
    Ok(Json(EvidenceResponse::from(&evidence)))
}

/// List a case's evidence
pub async fn list_evidence(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> ApiResult<Json<Vec<EvidenceResponse>>> {
    let case_id = CaseId(case_id);
    // 404 on unknown case rather than an empty list.
    state.cases.get_case(&case_id).await?;
    let evidence = state.cases.get_case_evidence(&case_id).await?;
    Ok(Json(evidence.iter().map(EvidenceResponse::from).collect()))
}

/// Submit a committee review
pub async fn submit_review(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(req): Json<SubmitReviewRequest>,
) -> ApiResult<Json<ReviewResponse>> {
    let pathway =
        ReviewPathway::parse(&req.pathway).map_err(|e| ApiError::Validation(e.to_string()))?;

    let review = state
        .cases
        .submit_review(
            &CaseId(case_id),
            req.reviewer_id,
            req.reviewer_role,
            req.credibility,
            pathway,
            req.rationale,
        )
        .await?;
    Ok(Json(ReviewResponse::from(&review)))
}

/// List a case's reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> ApiResult<Json<Vec<ReviewResponse>>> {
    let case_id = CaseId(case_id);
    state.cases.get_case(&case_id).await?;
    let reviews = state.cases.get_case_reviews(&case_id).await?;
    Ok(Json(reviews.iter().map(ReviewResponse::from).collect()))
}

/// List a case's deadlines
pub async fn list_deadlines(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> ApiResult<Json<Vec<DeadlineResponse>>> {
    let case_id = CaseId(case_id);
    state.cases.get_case(&case_id).await?;
    let deadlines = state.monitor.get_case_deadlines(&case_id).await?;
    Ok(Json(deadlines.iter().map(DeadlineResponse::from).collect()))
}

/// All deadlines currently overdue
pub async fn list_overdue_deadlines(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<DeadlineResponse>>> {
    let deadlines = state.monitor.get_overdue_deadlines().await?;
    Ok(Json(deadlines.iter().map(DeadlineResponse::from).collect()))
}
