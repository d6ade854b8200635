//! Outbound webhook event types
//!
//! One `WebhookEvent` row is the write-once audit record of a single
//! delivery attempt against the external automation endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::case::CaseId;

/// Webhook audit record identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WebhookEventId(pub String);

impl WebhookEventId {
    pub fn generate() -> Self {
        Self(format!("webhook:{}", uuid::Uuid::new_v4()))
    }
}

impl std::fmt::Display for WebhookEventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed set of outbound business events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    CaseCreated,
    EvidenceUploaded,
    HumanReviewSubmitted,
    CaseStatusChanged,
    DeadlineApproaching,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CaseCreated => "case_created",
            Self::EvidenceUploaded => "evidence_uploaded",
            Self::HumanReviewSubmitted => "human_review_submitted",
            Self::CaseStatusChanged => "case_status_changed",
            Self::DeadlineApproaching => "deadline_approaching",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delivery outcome of one dispatch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Success,
    Error,
}

/// Audit record of one outbound notification attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event_id: WebhookEventId,
    pub kind: EventKind,
    pub case_id: Option<CaseId>,
    /// Full payload as sent, envelope included
    pub payload: serde_json::Value,
    pub status: DeliveryStatus,
    /// Parsed response body on success
    pub response: Option<serde_json::Value>,
    /// Error message on failure
    pub error: Option<String>,
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}
