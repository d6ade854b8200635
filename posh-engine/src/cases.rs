//! Case lifecycle service
//!
//! Orchestrates case creation, evidence intake, status transitions and human
//! review over the store seam, scoring through the pure functions in
//! `posh_core::scoring` and announcing every change through the dispatcher.
//!
//! Creation is deliberately not transactional: the case insert is the only
//! fatal step. Evidence rows, the standard investigation deadline and the
//! case_created event are each logged-and-tolerated on failure; the monitor's
//! reconcile sweep repairs a case that lost its deadline.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use posh_core::case_number::generate_case_number;
use posh_core::scoring::{default_priority, evidence_score, needs_human_review, risk_level};
use posh_core::types::{
    Case, CaseId, CaseStatus, Evidence, EvidenceId, EvidenceKind, HumanReview, ReviewId,
    ReviewPathway, RiskLevel,
};

use crate::dispatch::{Dispatcher, EventPayload};
use crate::error::{EngineError, EngineResult};
use crate::monitor::DeadlineMonitor;
use crate::store::CaseStore;

/// Input for filing a new case
#[derive(Debug, Clone)]
pub struct NewCaseInput {
    pub title: String,
    pub description: String,
    pub complainant_name: String,
    pub respondent_name: String,
    pub evidence: Vec<NewEvidenceInput>,
    pub metadata: Option<serde_json::Value>,
}

/// One evidence item supplied at filing or attached later
#[derive(Debug, Clone)]
pub struct NewEvidenceInput {
    pub kind: EvidenceKind,
    pub description: String,
    pub file_ref: Option<String>,
}

/// Result of filing a case, with the derived triage fields
#[derive(Debug, Clone)]
pub struct CreatedCase {
    pub case: Case,
    pub evidence: Vec<Evidence>,
    pub needs_human_review: bool,
    pub risk_level: RiskLevel,
}

/// Case lifecycle service
pub struct CaseService {
    store: Arc<dyn CaseStore>,
    dispatcher: Arc<dyn Dispatcher>,
    monitor: Arc<DeadlineMonitor>,
}

impl CaseService {
    pub fn new(
        store: Arc<dyn CaseStore>,
        dispatcher: Arc<dyn Dispatcher>,
        monitor: Arc<DeadlineMonitor>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            monitor,
        }
    }

    /// File a new case.
    ///
    /// Scores the supplied evidence, generates the case number, inserts the
    /// case (fatal on failure), then best-effort: evidence rows, the 90-day
    /// investigation deadline, and the case_created event.
    pub async fn create_case(&self, input: NewCaseInput) -> EngineResult<CreatedCase> {
        if input.title.trim().is_empty() {
            return Err(EngineError::Validation("Title must not be empty".to_string()));
        }
        if input.complainant_name.trim().is_empty() {
            return Err(EngineError::Validation(
                "Complainant name must not be empty".to_string(),
            ));
        }

        let kinds: Vec<EvidenceKind> = input.evidence.iter().map(|e| e.kind).collect();
        let score = evidence_score(&kinds);
        let now = Utc::now();

        // Triage summary seeded at creation; the analysis callbacks replace
        // it once the automation pipeline has run.
        let triage = serde_json::json!({
            "evidence_score": score,
            "risk_level": risk_level(score),
            "needs_human_review": needs_human_review(score),
        });

        let case = Case {
            case_id: CaseId::generate(),
            case_number: generate_case_number(),
            title: input.title,
            description: input.description,
            complainant_name: input.complainant_name,
            respondent_name: input.respondent_name,
            status: CaseStatus::Pending,
            priority: default_priority(score),
            evidence_score: score,
            ai_analysis: Some(triage),
            metadata: input.metadata.unwrap_or_else(|| serde_json::json!({})),
            created_at: now,
            updated_at: now,
        };

        self.store.insert_case(&case).await?;
        info!(
            case_id = %case.case_id,
            case_number = %case.case_number,
            score,
            priority = ?case.priority,
            "Case created"
        );

        let mut evidence = Vec::with_capacity(input.evidence.len());
        for item in input.evidence {
            let row = Evidence {
                evidence_id: EvidenceId::generate(),
                case_id: case.case_id.clone(),
                kind: item.kind,
                description: item.description,
                file_ref: item.file_ref,
                ai_score: None,
                credibility: None,
                metadata: serde_json::json!({}),
                created_at: now,
            };
            match self.store.insert_evidence(&row).await {
                Ok(()) => evidence.push(row),
                Err(e) => warn!(
                    case_id = %case.case_id,
                    error = %e,
                    "Failed to insert evidence row"
                ),
            }
        }

        if let Err(e) = self
            .monitor
            .create_deadline(
                &case.case_id,
                posh_core::types::DeadlineKind::Investigation,
                self.monitor.investigation_window_days(),
                Some("Statutory investigation completion window".to_string()),
            )
            .await
        {
            warn!(
                case_id = %case.case_id,
                error = %e,
                "Failed to create investigation deadline"
            );
        }

        let outcome = self
            .dispatcher
            .dispatch(EventPayload::CaseCreated {
                case_id: case.case_id.clone(),
                case_number: case.case_number.clone(),
                title: case.title.clone(),
                complainant_name: case.complainant_name.clone(),
                respondent_name: case.respondent_name.clone(),
                priority: case.priority,
                evidence_score: score,
                needs_human_review: needs_human_review(score),
                risk_level: risk_level(score),
                evidence_kinds: kinds,
            })
            .await;
        if !outcome.success {
            warn!(
                case_id = %case.case_id,
                error = outcome.error.as_deref().unwrap_or(""),
                "case_created event delivery failed"
            );
        }

        Ok(CreatedCase {
            needs_human_review: needs_human_review(score),
            risk_level: risk_level(score),
            case,
            evidence,
        })
    }

    /// Fetch a case by id
    pub async fn get_case(&self, case_id: &CaseId) -> EngineResult<Case> {
        self.store
            .get_case(case_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("Case not found: {}", case_id)))
    }

    /// Move a case along the status graph.
    ///
    /// The store write happens before the case_status_changed dispatch;
    /// delivery failure does not roll the transition back.
    pub async fn update_status(
        &self,
        case_id: &CaseId,
        new_status: CaseStatus,
        assignee: Option<String>,
    ) -> EngineResult<Case> {
        let case = self.get_case(case_id).await?;
        let old_status = case.status;
        old_status.transition_to(new_status)?;

        self.store.update_case_status(case_id, new_status).await?;
        info!(
            case_id = %case_id,
            from = old_status.as_str(),
            to = new_status.as_str(),
            "Case status changed"
        );

        // Closing a case settles its remaining obligations.
        if new_status == CaseStatus::Closed {
            let now = Utc::now();
            for deadline in self.store.list_case_deadlines(case_id).await? {
                if deadline.status.is_open() {
                    self.store
                        .complete_deadline(&deadline.deadline_id, now)
                        .await?;
                }
            }
        }

        let outcome = self
            .dispatcher
            .dispatch(EventPayload::CaseStatusChanged {
                case_id: case_id.clone(),
                old_status,
                new_status,
                assignee,
            })
            .await;
        if !outcome.success {
            warn!(
                case_id = %case_id,
                error = outcome.error.as_deref().unwrap_or(""),
                "case_status_changed event delivery failed"
            );
        }

        self.get_case(case_id).await
    }

    /// Attach a new evidence item to an existing case and recompute the
    /// case's evidence score over everything now on file.
    pub async fn add_evidence(
        &self,
        case_id: &CaseId,
        input: NewEvidenceInput,
    ) -> EngineResult<Evidence> {
        let case = self.get_case(case_id).await?;
        if !case.status.is_open() {
            return Err(EngineError::Validation(
                "Cannot attach evidence to a closed case".to_string(),
            ));
        }

        let row = Evidence {
            evidence_id: EvidenceId::generate(),
            case_id: case_id.clone(),
            kind: input.kind,
            description: input.description,
            file_ref: input.file_ref,
            ai_score: None,
            credibility: None,
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
        };
        self.store.insert_evidence(&row).await?;

        let kinds: Vec<EvidenceKind> = self
            .store
            .list_case_evidence(case_id)
            .await?
            .iter()
            .map(|e| e.kind)
            .collect();
        let score = evidence_score(&kinds);
        self.store.update_case_score(case_id, score).await?;

        let outcome = self
            .dispatcher
            .dispatch(EventPayload::EvidenceUploaded {
                case_id: case_id.clone(),
                evidence_id: row.evidence_id.clone(),
                kind: row.kind,
                description: row.description.clone(),
                case_score: score,
            })
            .await;
        if !outcome.success {
            warn!(
                case_id = %case_id,
                error = outcome.error.as_deref().unwrap_or(""),
                "evidence_uploaded event delivery failed"
            );
        }

        Ok(row)
    }

    /// Record a committee member's review and drive the case into the status
    /// the chosen pathway maps to. The review row is kept even when the case
    /// already sits in the target status.
    pub async fn submit_review(
        &self,
        case_id: &CaseId,
        reviewer_id: String,
        reviewer_role: String,
        credibility: u8,
        pathway: ReviewPathway,
        rationale: String,
    ) -> EngineResult<HumanReview> {
        let case = self.get_case(case_id).await?;

        let review = HumanReview {
            review_id: ReviewId::generate(),
            case_id: case_id.clone(),
            reviewer_id,
            reviewer_role,
            credibility,
            pathway,
            rationale,
            created_at: Utc::now(),
        };
        review.validate()?;
        self.store.insert_review(&review).await?;
        info!(
            case_id = %case_id,
            review_id = %review.review_id,
            pathway = pathway.as_str(),
            "Human review recorded"
        );

        let outcome = self
            .dispatcher
            .dispatch(EventPayload::HumanReviewSubmitted {
                case_id: case_id.clone(),
                review_id: review.review_id.clone(),
                reviewer_id: review.reviewer_id.clone(),
                reviewer_role: review.reviewer_role.clone(),
                credibility: review.credibility,
                pathway,
            })
            .await;
        if !outcome.success {
            warn!(
                case_id = %case_id,
                error = outcome.error.as_deref().unwrap_or(""),
                "human_review_submitted event delivery failed"
            );
        }

        let target = pathway.target_status();
        if case.status != target {
            self.update_status(case_id, target, None).await?;
        }

        Ok(review)
    }

    /// All evidence on file for a case
    pub async fn get_case_evidence(&self, case_id: &CaseId) -> EngineResult<Vec<Evidence>> {
        self.store.list_case_evidence(case_id).await
    }

    /// All reviews submitted for a case
    pub async fn get_case_reviews(&self, case_id: &CaseId) -> EngineResult<Vec<HumanReview>> {
        self.store.list_case_reviews(case_id).await
    }
}
