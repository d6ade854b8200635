//! Store seam
//!
//! The services in this crate hold no durable state of their own; all
//! entities live in an external relational store reached through the
//! [`CaseStore`] trait. Conditional transition methods (`mark_alert_sent`,
//! `mark_overdue`, `complete_deadline`) return whether a row was affected so
//! that the store's row-level atomicity, not application logic, decides the
//! winner when two scans race.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use posh_core::types::{
    Case, CaseId, CaseStatus, ComplianceDeadline, DeadlineId, Evidence, EvidenceId, HumanReview,
    WebhookEvent,
};

use crate::error::EngineResult;

/// Access to the external relational store.
///
/// Tables consumed: cases, evidence, compliance_deadlines, case_reviews,
/// webhook_logs.
#[async_trait]
pub trait CaseStore: Send + Sync {
    // ==================== Cases ====================

    /// Insert a new case row
    async fn insert_case(&self, case: &Case) -> EngineResult<()>;

    /// Fetch a case by id
    async fn get_case(&self, case_id: &CaseId) -> EngineResult<Option<Case>>;

    /// Update a case's lifecycle status
    async fn update_case_status(&self, case_id: &CaseId, status: CaseStatus) -> EngineResult<()>;

    /// Update a case's evidence score
    async fn update_case_score(&self, case_id: &CaseId, score: u32) -> EngineResult<()>;

    /// Write an AI-analysis blob (and optionally a recomputed score) onto a case
    async fn update_case_analysis(
        &self,
        case_id: &CaseId,
        analysis: serde_json::Value,
        score: Option<u32>,
    ) -> EngineResult<()>;

    /// Merge a key/value pair into a case's metadata blob
    async fn append_case_metadata(
        &self,
        case_id: &CaseId,
        key: &str,
        value: serde_json::Value,
    ) -> EngineResult<()>;

    /// Cases created within the given range, inclusive start, exclusive end
    async fn list_cases_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> EngineResult<Vec<Case>>;

    /// Ids of all cases whose status is still open
    async fn list_open_case_ids(&self) -> EngineResult<Vec<CaseId>>;

    // ==================== Evidence ====================

    /// Insert an evidence row
    async fn insert_evidence(&self, evidence: &Evidence) -> EngineResult<()>;

    /// All evidence attached to a case
    async fn list_case_evidence(&self, case_id: &CaseId) -> EngineResult<Vec<Evidence>>;

    /// Write AI analysis results onto an evidence row
    async fn update_evidence_analysis(
        &self,
        evidence_id: &EvidenceId,
        ai_score: u32,
        credibility: u8,
    ) -> EngineResult<bool>;

    // ==================== Deadlines ====================

    /// Insert a deadline row
    async fn insert_deadline(&self, deadline: &ComplianceDeadline) -> EngineResult<()>;

    /// Fetch a deadline by id
    async fn get_deadline(&self, deadline_id: &DeadlineId)
        -> EngineResult<Option<ComplianceDeadline>>;

    /// Open deadlines (Pending or AlertSent) due before the cutoff,
    /// ascending by due date. Includes anything already past due.
    async fn list_open_deadlines(
        &self,
        due_before: DateTime<Utc>,
    ) -> EngineResult<Vec<ComplianceDeadline>>;

    /// Conditional Pending -> AlertSent transition.
    ///
    /// Returns false when the row was not in Pending, i.e. another scan
    /// already claimed it.
    async fn mark_alert_sent(
        &self,
        deadline_id: &DeadlineId,
        at: DateTime<Utc>,
    ) -> EngineResult<bool>;

    /// Conditional {Pending, AlertSent} -> Overdue transition, recording the
    /// alert timestamp. Returns false when the row was not open.
    async fn mark_overdue(&self, deadline_id: &DeadlineId, at: DateTime<Utc>)
        -> EngineResult<bool>;

    /// Conditional transition to Completed from any non-Completed status.
    async fn complete_deadline(
        &self,
        deadline_id: &DeadlineId,
        at: DateTime<Utc>,
    ) -> EngineResult<bool>;

    /// Stamp the external delivery acknowledgement onto a deadline
    async fn set_alert_timestamp(
        &self,
        deadline_id: &DeadlineId,
        at: DateTime<Utc>,
    ) -> EngineResult<bool>;

    /// All deadlines tied to a case
    async fn list_case_deadlines(&self, case_id: &CaseId)
        -> EngineResult<Vec<ComplianceDeadline>>;

    /// All deadlines currently marked Overdue
    async fn list_overdue_deadlines(&self) -> EngineResult<Vec<ComplianceDeadline>>;

    // ==================== Reviews ====================

    /// Insert a review row
    async fn insert_review(&self, review: &HumanReview) -> EngineResult<()>;

    /// All reviews submitted for a case
    async fn list_case_reviews(&self, case_id: &CaseId) -> EngineResult<Vec<HumanReview>>;

    // ==================== Webhook audit ====================

    /// Append a write-once dispatch audit record
    async fn record_webhook_event(&self, event: &WebhookEvent) -> EngineResult<()>;

    /// Audit records, optionally filtered by case, newest first
    async fn list_webhook_events(
        &self,
        case_id: Option<&CaseId>,
    ) -> EngineResult<Vec<WebhookEvent>>;
}

pub use memory::MemoryStore;
