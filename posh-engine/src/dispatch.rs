//! Webhook Dispatcher
//!
//! Translates typed domain events into HTTP POSTs against the configured
//! workflow-automation endpoint and reports outcomes uniformly. Expected
//! failure modes (non-2xx, network error, timeout) never surface as `Err`;
//! they become `{success: false, error}` outcomes. Every attempt, success or
//! failure, is recorded in the webhook audit log; an audit-write failure is
//! logged and swallowed so it cannot mask the dispatch result.
//!
//! The dispatcher performs no retries and no deduplication: at-most-once
//! delivery attempt per call. De-duplication discipline belongs to the
//! caller (see the deadline monitor).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use posh_core::types::{
    CaseId, CasePriority, CaseStatus, DeadlineId, DeadlineKind, DeliveryStatus, EvidenceId,
    EvidenceKind, EventKind, ReviewId, ReviewPathway, RiskLevel, Urgency, WebhookEvent,
    WebhookEventId,
};

use crate::config::WebhookConfig;
use crate::error::{EngineError, EngineResult};
use crate::store::CaseStore;

/// Event-specific payload, one variant per [`EventKind`].
///
/// Typed rather than an untyped map so payload shape drift is caught at
/// compile time.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    CaseCreated {
        case_id: CaseId,
        case_number: String,
        title: String,
        complainant_name: String,
        respondent_name: String,
        priority: CasePriority,
        evidence_score: u32,
        needs_human_review: bool,
        risk_level: RiskLevel,
        evidence_kinds: Vec<EvidenceKind>,
    },
    EvidenceUploaded {
        case_id: CaseId,
        evidence_id: EvidenceId,
        kind: EvidenceKind,
        description: String,
        case_score: u32,
    },
    HumanReviewSubmitted {
        case_id: CaseId,
        review_id: ReviewId,
        reviewer_id: String,
        reviewer_role: String,
        credibility: u8,
        pathway: ReviewPathway,
    },
    CaseStatusChanged {
        case_id: CaseId,
        old_status: CaseStatus,
        new_status: CaseStatus,
        assignee: Option<String>,
    },
    DeadlineApproaching {
        case_id: CaseId,
        deadline_id: DeadlineId,
        deadline_kind: DeadlineKind,
        due_at: DateTime<Utc>,
        urgency: Urgency,
        days_remaining: i64,
        case_number: String,
        case_title: String,
    },
}

impl EventPayload {
    /// Event kind this payload belongs to
    pub fn kind(&self) -> EventKind {
        match self {
            Self::CaseCreated { .. } => EventKind::CaseCreated,
            Self::EvidenceUploaded { .. } => EventKind::EvidenceUploaded,
            Self::HumanReviewSubmitted { .. } => EventKind::HumanReviewSubmitted,
            Self::CaseStatusChanged { .. } => EventKind::CaseStatusChanged,
            Self::DeadlineApproaching { .. } => EventKind::DeadlineApproaching,
        }
    }

    /// Target case, when the event concerns one
    pub fn case_id(&self) -> Option<&CaseId> {
        match self {
            Self::CaseCreated { case_id, .. }
            | Self::EvidenceUploaded { case_id, .. }
            | Self::HumanReviewSubmitted { case_id, .. }
            | Self::CaseStatusChanged { case_id, .. }
            | Self::DeadlineApproaching { case_id, .. } => Some(case_id),
        }
    }
}

/// Wire envelope: the event payload plus timestamp and source tag
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    event: &'static str,
    timestamp: DateTime<Utc>,
    source: &'a str,
    #[serde(flatten)]
    payload: &'a EventPayload,
}

/// Uniform result of one dispatch attempt
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub success: bool,
    /// Workflow execution id, from the response body when present,
    /// synthesized otherwise
    pub execution_id: Option<String>,
    /// Parsed response body on success
    pub response: Option<serde_json::Value>,
    /// Error message on failure
    pub error: Option<String>,
}

impl DispatchOutcome {
    fn succeeded(execution_id: String, response: serde_json::Value) -> Self {
        Self {
            success: true,
            execution_id: Some(execution_id),
            response: Some(response),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            execution_id: None,
            response: None,
            error: Some(error),
        }
    }
}

/// Outbound event sender seam.
///
/// The deadline monitor and case service depend on this trait so they can be
/// exercised with a recording fake.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Deliver one event; never returns `Err` for expected failure modes.
    async fn dispatch(&self, payload: EventPayload) -> DispatchOutcome;
}

/// HTTP webhook dispatcher
pub struct WebhookDispatcher {
    client: Client,
    config: WebhookConfig,
    store: Arc<dyn CaseStore>,
}

impl WebhookDispatcher {
    /// Create a dispatcher with an explicit request timeout
    pub fn new(config: WebhookConfig, store: Arc<dyn CaseStore>) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            config,
            store,
        })
    }

    /// Destination URL for an event kind
    fn endpoint_for(&self, kind: EventKind) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            kind.as_str().replace('_', "-")
        )
    }

    async fn post(&self, kind: EventKind, body: &serde_json::Value) -> DispatchOutcome {
        let url = self.endpoint_for(kind);

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body);

        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return DispatchOutcome::failed(format!("Request failed: {}", e)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return DispatchOutcome::failed(format!(
                "Webhook endpoint returned {}: {}",
                status.as_u16(),
                body
            ));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .unwrap_or_else(|_| serde_json::json!({}));

        let execution_id = response_body
            .get("executionId")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("exec-{}", Utc::now().timestamp_millis()));

        DispatchOutcome::succeeded(execution_id, response_body)
    }

    /// Write the audit record for one attempt. Failures are logged and
    /// swallowed; they must not replace the dispatch result.
    async fn record_audit(
        &self,
        payload_json: serde_json::Value,
        kind: EventKind,
        case_id: Option<CaseId>,
        outcome: &DispatchOutcome,
        duration_ms: u64,
    ) {
        let event = WebhookEvent {
            event_id: WebhookEventId::generate(),
            kind,
            case_id,
            payload: payload_json,
            status: if outcome.success {
                DeliveryStatus::Success
            } else {
                DeliveryStatus::Error
            },
            response: outcome.response.clone(),
            error: outcome.error.clone(),
            duration_ms,
            created_at: Utc::now(),
        };

        if let Err(e) = self.store.record_webhook_event(&event).await {
            warn!(
                event = %kind,
                error = %e,
                "Failed to write webhook audit record"
            );
        }
    }
}

#[async_trait]
impl Dispatcher for WebhookDispatcher {
    async fn dispatch(&self, payload: EventPayload) -> DispatchOutcome {
        let kind = payload.kind();
        let case_id = payload.case_id().cloned();

        let envelope = Envelope {
            event: kind.as_str(),
            timestamp: Utc::now(),
            source: &self.config.source,
            payload: &payload,
        };

        let body = match serde_json::to_value(&envelope) {
            Ok(body) => body,
            Err(e) => {
                // Payloads are plain data; a serialization failure is a bug,
                // but it still follows the outcome and audit contracts. The
                // audit row carries a minimal payload since the real one
                // could not be rendered.
                let outcome =
                    DispatchOutcome::failed(format!("Payload serialization failed: {}", e));
                self.record_audit(
                    serde_json::json!({ "event": kind.as_str() }),
                    kind,
                    case_id,
                    &outcome,
                    0,
                )
                .await;
                return outcome;
            }
        };

        let start = std::time::Instant::now();
        let outcome = self.post(kind, &body).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        if outcome.success {
            debug!(
                event = %kind,
                duration_ms,
                execution_id = outcome.execution_id.as_deref().unwrap_or(""),
                "Webhook dispatched"
            );
        } else {
            warn!(
                event = %kind,
                duration_ms,
                error = outcome.error.as_deref().unwrap_or(""),
                "Webhook dispatch failed"
            );
        }

        self.record_audit(body, kind, case_id, &outcome, duration_ms)
            .await;

        outcome
    }
}

/// Dispatcher that records events instead of delivering them.
///
/// Used by the engine's tests and by offline development; every call
/// succeeds with a fixed execution id unless `fail_next` has been armed.
#[derive(Default)]
pub struct RecordingDispatcher {
    events: tokio::sync::Mutex<Vec<EventPayload>>,
    fail: std::sync::atomic::AtomicBool,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent dispatches report failure
    pub fn fail_dispatches(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Events dispatched so far
    pub async fn events(&self) -> Vec<EventPayload> {
        self.events.lock().await.clone()
    }

    /// Count of dispatched events of the given kind
    pub async fn count(&self, kind: EventKind) -> usize {
        self.events
            .lock()
            .await
            .iter()
            .filter(|p| p.kind() == kind)
            .count()
    }
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    async fn dispatch(&self, payload: EventPayload) -> DispatchOutcome {
        self.events.lock().await.push(payload);
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            DispatchOutcome::failed("simulated delivery failure".to_string())
        } else {
            DispatchOutcome::succeeded("exec-test".to_string(), serde_json::json!({}))
        }
    }
}
