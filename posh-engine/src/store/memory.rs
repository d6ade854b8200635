//! In-memory store implementation
//!
//! Thread-safe stand-in for the hosted relational backend, used by tests and
//! local development. Conditional transitions are applied under a write lock,
//! matching the row-level atomicity the external store provides.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use posh_core::types::{
    Case, CaseId, CaseStatus, ComplianceDeadline, DeadlineId, DeadlineStatus, Evidence,
    EvidenceId, HumanReview, WebhookEvent,
};

use super::CaseStore;
use crate::error::{EngineError, EngineResult};

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    cases: Arc<RwLock<HashMap<CaseId, Case>>>,
    evidence: Arc<RwLock<HashMap<EvidenceId, Evidence>>>,
    deadlines: Arc<RwLock<HashMap<DeadlineId, ComplianceDeadline>>>,
    reviews: Arc<RwLock<Vec<HumanReview>>>,
    webhook_log: Arc<RwLock<Vec<WebhookEvent>>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all tables
    pub async fn clear(&self) {
        self.cases.write().await.clear();
        self.evidence.write().await.clear();
        self.deadlines.write().await.clear();
        self.reviews.write().await.clear();
        self.webhook_log.write().await.clear();
    }
}

#[async_trait]
impl CaseStore for MemoryStore {
    // ==================== Cases ====================

    async fn insert_case(&self, case: &Case) -> EngineResult<()> {
        let mut cases = self.cases.write().await;
        if cases.contains_key(&case.case_id) {
            return Err(EngineError::Storage(format!(
                "Duplicate case id: {}",
                case.case_id
            )));
        }
        cases.insert(case.case_id.clone(), case.clone());
        Ok(())
    }

    async fn get_case(&self, case_id: &CaseId) -> EngineResult<Option<Case>> {
        let cases = self.cases.read().await;
        Ok(cases.get(case_id).cloned())
    }

    async fn update_case_status(&self, case_id: &CaseId, status: CaseStatus) -> EngineResult<()> {
        let mut cases = self.cases.write().await;
        let case = cases
            .get_mut(case_id)
            .ok_or_else(|| EngineError::NotFound(format!("Case {} not found", case_id)))?;
        case.status = status;
        case.updated_at = Utc::now();
        Ok(())
    }

    async fn update_case_score(&self, case_id: &CaseId, score: u32) -> EngineResult<()> {
        let mut cases = self.cases.write().await;
        let case = cases
            .get_mut(case_id)
            .ok_or_else(|| EngineError::NotFound(format!("Case {} not found", case_id)))?;
        case.evidence_score = score;
        case.updated_at = Utc::now();
        Ok(())
    }

    async fn update_case_analysis(
        &self,
        case_id: &CaseId,
        analysis: serde_json::Value,
        score: Option<u32>,
    ) -> EngineResult<()> {
        let mut cases = self.cases.write().await;
        let case = cases
            .get_mut(case_id)
            .ok_or_else(|| EngineError::NotFound(format!("Case {} not found", case_id)))?;
        case.ai_analysis = Some(analysis);
        if let Some(score) = score {
            case.evidence_score = score;
        }
        case.updated_at = Utc::now();
        Ok(())
    }

    async fn append_case_metadata(
        &self,
        case_id: &CaseId,
        key: &str,
        value: serde_json::Value,
    ) -> EngineResult<()> {
        let mut cases = self.cases.write().await;
        let case = cases
            .get_mut(case_id)
            .ok_or_else(|| EngineError::NotFound(format!("Case {} not found", case_id)))?;
        match case.metadata.as_object_mut() {
            Some(map) => {
                map.insert(key.to_string(), value);
            }
            None => {
                case.metadata = serde_json::json!({ key: value });
            }
        }
        case.updated_at = Utc::now();
        Ok(())
    }

    async fn list_cases_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> EngineResult<Vec<Case>> {
        let cases = self.cases.read().await;
        let mut out: Vec<Case> = cases
            .values()
            .filter(|c| c.created_at >= start && c.created_at < end)
            .cloned()
            .collect();
        out.sort_by_key(|c| c.created_at);
        Ok(out)
    }

    async fn list_open_case_ids(&self) -> EngineResult<Vec<CaseId>> {
        let cases = self.cases.read().await;
        Ok(cases
            .values()
            .filter(|c| c.status.is_open())
            .map(|c| c.case_id.clone())
            .collect())
    }

    // ==================== Evidence ====================

    async fn insert_evidence(&self, evidence: &Evidence) -> EngineResult<()> {
        let mut table = self.evidence.write().await;
        table.insert(evidence.evidence_id.clone(), evidence.clone());
        Ok(())
    }

    async fn list_case_evidence(&self, case_id: &CaseId) -> EngineResult<Vec<Evidence>> {
        let table = self.evidence.read().await;
        let mut out: Vec<Evidence> = table
            .values()
            .filter(|e| &e.case_id == case_id)
            .cloned()
            .collect();
        out.sort_by_key(|e| e.created_at);
        Ok(out)
    }

    async fn update_evidence_analysis(
        &self,
        evidence_id: &EvidenceId,
        ai_score: u32,
        credibility: u8,
    ) -> EngineResult<bool> {
        let mut table = self.evidence.write().await;
        match table.get_mut(evidence_id) {
            Some(evidence) => {
                evidence.ai_score = Some(ai_score);
                evidence.credibility = Some(credibility);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ==================== Deadlines ====================

    async fn insert_deadline(&self, deadline: &ComplianceDeadline) -> EngineResult<()> {
        let mut table = self.deadlines.write().await;
        table.insert(deadline.deadline_id.clone(), deadline.clone());
        Ok(())
    }

    async fn get_deadline(
        &self,
        deadline_id: &DeadlineId,
    ) -> EngineResult<Option<ComplianceDeadline>> {
        let table = self.deadlines.read().await;
        Ok(table.get(deadline_id).cloned())
    }

    async fn list_open_deadlines(
        &self,
        due_before: DateTime<Utc>,
    ) -> EngineResult<Vec<ComplianceDeadline>> {
        let table = self.deadlines.read().await;
        let mut out: Vec<ComplianceDeadline> = table
            .values()
            .filter(|d| d.status.is_open() && d.due_at < due_before)
            .cloned()
            .collect();
        out.sort_by_key(|d| d.due_at);
        Ok(out)
    }

    async fn mark_alert_sent(
        &self,
        deadline_id: &DeadlineId,
        at: DateTime<Utc>,
    ) -> EngineResult<bool> {
        let mut table = self.deadlines.write().await;
        match table.get_mut(deadline_id) {
            Some(d) if d.status == DeadlineStatus::Pending => {
                d.status = DeadlineStatus::AlertSent;
                d.alert_sent_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_overdue(
        &self,
        deadline_id: &DeadlineId,
        at: DateTime<Utc>,
    ) -> EngineResult<bool> {
        let mut table = self.deadlines.write().await;
        match table.get_mut(deadline_id) {
            Some(d) if d.status.is_open() => {
                d.status = DeadlineStatus::Overdue;
                d.alert_sent_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn complete_deadline(
        &self,
        deadline_id: &DeadlineId,
        at: DateTime<Utc>,
    ) -> EngineResult<bool> {
        let mut table = self.deadlines.write().await;
        match table.get_mut(deadline_id) {
            Some(d) if d.status != DeadlineStatus::Completed => {
                d.status = DeadlineStatus::Completed;
                d.completed_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_alert_timestamp(
        &self,
        deadline_id: &DeadlineId,
        at: DateTime<Utc>,
    ) -> EngineResult<bool> {
        let mut table = self.deadlines.write().await;
        match table.get_mut(deadline_id) {
            Some(d) => {
                d.alert_sent_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_case_deadlines(
        &self,
        case_id: &CaseId,
    ) -> EngineResult<Vec<ComplianceDeadline>> {
        let table = self.deadlines.read().await;
        let mut out: Vec<ComplianceDeadline> = table
            .values()
            .filter(|d| &d.case_id == case_id)
            .cloned()
            .collect();
        out.sort_by_key(|d| d.due_at);
        Ok(out)
    }

    async fn list_overdue_deadlines(&self) -> EngineResult<Vec<ComplianceDeadline>> {
        let table = self.deadlines.read().await;
        let mut out: Vec<ComplianceDeadline> = table
            .values()
            .filter(|d| d.status == DeadlineStatus::Overdue)
            .cloned()
            .collect();
        out.sort_by_key(|d| d.due_at);
        Ok(out)
    }

    // ==================== Reviews ====================

    async fn insert_review(&self, review: &HumanReview) -> EngineResult<()> {
        self.reviews.write().await.push(review.clone());
        Ok(())
    }

    async fn list_case_reviews(&self, case_id: &CaseId) -> EngineResult<Vec<HumanReview>> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .iter()
            .filter(|r| &r.case_id == case_id)
            .cloned()
            .collect())
    }

    // ==================== Webhook audit ====================

    async fn record_webhook_event(&self, event: &WebhookEvent) -> EngineResult<()> {
        self.webhook_log.write().await.push(event.clone());
        Ok(())
    }

    async fn list_webhook_events(
        &self,
        case_id: Option<&CaseId>,
    ) -> EngineResult<Vec<WebhookEvent>> {
        let log = self.webhook_log.read().await;
        Ok(log
            .iter()
            .filter(|e| match case_id {
                Some(id) => e.case_id.as_ref() == Some(id),
                None => true,
            })
            .rev()
            .cloned()
            .collect())
    }
}
