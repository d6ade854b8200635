//! Data Transfer Objects for API requests and responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use posh_core::types::{Case, ComplianceDeadline, Evidence, HumanReview};

// ============ Case DTOs ============

/// File a new case
#[derive(Debug, Deserialize)]
pub struct CreateCaseRequest {
    pub title: String,
    pub description: String,
    pub complainant_name: String,
    pub respondent_name: String,
    /// Evidence supplied at filing
    #[serde(default)]
    pub evidence: Vec<EvidenceItemRequest>,
    pub metadata: Option<serde_json::Value>,
}

/// One evidence item in a filing or upload request
#[derive(Debug, Deserialize)]
pub struct EvidenceItemRequest {
    /// Evidence kind (document, witness, physical, digital)
    pub kind: String,
    pub description: String,
    pub file_ref: Option<String>,
}

/// Case response
#[derive(Debug, Serialize)]
pub struct CaseResponse {
    pub case_id: String,
    pub case_number: String,
    pub title: String,
    pub description: String,
    pub complainant_name: String,
    pub respondent_name: String,
    pub status: String,
    pub priority: String,
    pub evidence_score: u32,
    pub ai_analysis: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Case> for CaseResponse {
    fn from(case: &Case) -> Self {
        Self {
            case_id: case.case_id.0.clone(),
            case_number: case.case_number.clone(),
            title: case.title.clone(),
            description: case.description.clone(),
            complainant_name: case.complainant_name.clone(),
            respondent_name: case.respondent_name.clone(),
            status: case.status.as_str().to_string(),
            priority: case.priority.as_str().to_string(),
            evidence_score: case.evidence_score,
            ai_analysis: case.ai_analysis.clone(),
            created_at: case.created_at,
            updated_at: case.updated_at,
        }
    }
}

/// Filing response, with the derived triage fields
#[derive(Debug, Serialize)]
pub struct CreatedCaseResponse {
    #[serde(flatten)]
    pub case: CaseResponse,
    pub needs_human_review: bool,
    pub risk_level: String,
}

/// Update case status request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New status (pending, under_review, investigating, mediation,
    /// escalated, closed)
    pub status: String,
    pub assignee: Option<String>,
}

/// Submit a committee review
#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub reviewer_id: String,
    pub reviewer_role: String,
    /// Credibility assessment, 1-5
    pub credibility: u8,
    /// Recommended pathway (formal, mediation, alternative, dismiss)
    pub pathway: String,
    #[serde(default)]
    pub rationale: String,
}

/// Review response
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub review_id: String,
    pub case_id: String,
    pub reviewer_id: String,
    pub reviewer_role: String,
    pub credibility: u8,
    pub pathway: String,
    pub rationale: String,
    pub created_at: DateTime<Utc>,
}

impl From<&HumanReview> for ReviewResponse {
    fn from(review: &HumanReview) -> Self {
        Self {
            review_id: review.review_id.0.clone(),
            case_id: review.case_id.0.clone(),
            reviewer_id: review.reviewer_id.clone(),
            reviewer_role: review.reviewer_role.clone(),
            credibility: review.credibility,
            pathway: review.pathway.as_str().to_string(),
            rationale: review.rationale.clone(),
            created_at: review.created_at,
        }
    }
}

/// Evidence response
#[derive(Debug, Serialize)]
pub struct EvidenceResponse {
    pub evidence_id: String,
    pub case_id: String,
    pub kind: String,
    pub description: String,
    pub file_ref: Option<String>,
    pub ai_score: Option<u32>,
    pub credibility: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl From<&Evidence> for EvidenceResponse {
    fn from(evidence: &Evidence) -> Self {
        Self {
            evidence_id: evidence.evidence_id.0.clone(),
            case_id: evidence.case_id.0.clone(),
            kind: evidence.kind.as_str().to_string(),
            description: evidence.description.clone(),
            file_ref: evidence.file_ref.clone(),
            ai_score: evidence.ai_score,
            credibility: evidence.credibility,
            created_at: evidence.created_at,
        }
    }
}

/// Deadline response
#[derive(Debug, Serialize)]
pub struct DeadlineResponse {
    pub deadline_id: String,
    pub case_id: String,
    pub kind: String,
    pub due_at: DateTime<Utc>,
    pub status: String,
    pub urgency: String,
    pub description: Option<String>,
    pub alert_sent_at: Option<DateTime<Utc>>,
    pub days_remaining: i64,
}

impl From<&ComplianceDeadline> for DeadlineResponse {
    fn from(deadline: &ComplianceDeadline) -> Self {
        Self {
            deadline_id: deadline.deadline_id.0.clone(),
            case_id: deadline.case_id.0.clone(),
            kind: deadline.kind.as_str().to_string(),
            due_at: deadline.due_at,
            status: deadline.status.as_str().to_string(),
            urgency: deadline.urgency.as_str().to_string(),
            description: deadline.description.clone(),
            alert_sent_at: deadline.alert_sent_at,
            days_remaining: deadline.days_remaining(Utc::now()),
        }
    }
}

// ============ Report DTOs ============

/// Report window query parameters
#[derive(Debug, Deserialize)]
pub struct ReportQueryParams {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

// ============ Callback DTOs ============

/// Acknowledgement returned by every callback endpoint
#[derive(Debug, Serialize)]
pub struct CallbackAck {
    pub success: bool,
    pub processed: String,
}

impl CallbackAck {
    pub fn processed(endpoint: &str) -> Self {
        Self {
            success: true,
            processed: endpoint.to_string(),
        }
    }
}

/// AI case analysis written back by the automation pipeline
#[derive(Debug, Deserialize)]
pub struct CaseAnalysisCompleteRequest {
    pub case_id: String,
    /// Opaque analysis blob, stored as-is
    pub analysis: serde_json::Value,
    /// Recomputed evidence score, when the pipeline produced one
    pub score: Option<u32>,
}

/// AI evidence analysis written back by the automation pipeline
#[derive(Debug, Deserialize)]
pub struct EvidenceAnalysisCompleteRequest {
    pub evidence_id: String,
    pub ai_score: u32,
    pub credibility: u8,
}

/// External task reference for an investigation
#[derive(Debug, Deserialize)]
pub struct InvestigationTaskCreatedRequest {
    pub case_id: String,
    /// Identifier of the task in the external tracker
    pub task_ref: String,
    pub task_url: Option<String>,
}

/// Delivery acknowledgement for a deadline alert
#[derive(Debug, Deserialize)]
pub struct DeadlineAlertSentRequest {
    pub deadline_id: String,
    /// Delivery time; defaults to now
    pub sent_at: Option<DateTime<Utc>>,
}

/// External notification record
#[derive(Debug, Deserialize)]
pub struct NotificationSentRequest {
    pub case_id: Option<String>,
    /// Delivery channel (email, slack, sms)
    pub channel: String,
    pub recipient: String,
    #[serde(default)]
    pub detail: serde_json::Value,
}

// ============ Health DTOs ============

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub monitor_running: bool,
}
