//! Compliance Reporter
//!
//! Point-in-time reporting over cases created in a window, joined with their
//! deadlines. Closed and closed-on-time are tracked separately: a case closed
//! after its investigation window lapsed counts toward the compliance rate
//! but not the on-time rate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use posh_core::types::CaseStatus;

use crate::error::{EngineError, EngineResult};
use crate::store::CaseStore;

/// Aggregated compliance figures for one reporting window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    /// Cases created in the window
    pub total_cases: usize,
    /// Cases closed, regardless of timing
    pub closed: usize,
    /// Cases closed before their earliest deadline lapsed
    pub closed_on_time: usize,
    /// Open cases with at least one past-due deadline
    pub overdue: usize,
    /// Cases not yet closed
    pub pending: usize,
    /// closed / total x 100, 0 for an empty window
    pub compliance_rate: f64,
    /// closed_on_time / total x 100, 0 for an empty window
    pub on_time_rate: f64,
    pub generated_at: DateTime<Utc>,
}

/// Compliance reporter
pub struct ComplianceReporter {
    store: Arc<dyn CaseStore>,
}

impl ComplianceReporter {
    pub fn new(store: Arc<dyn CaseStore>) -> Self {
        Self { store }
    }

    /// Build the report for cases created in `[start, end)`.
    pub async fn generate(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> EngineResult<ComplianceReport> {
        if end <= start {
            return Err(EngineError::Validation(
                "Report window end must be after start".to_string(),
            ));
        }

        let now = Utc::now();
        let cases = self.store.list_cases_created_between(start, end).await?;

        let mut closed = 0;
        let mut closed_on_time = 0;
        let mut overdue = 0;
        let mut pending = 0;

        for case in &cases {
            let deadlines = self.store.list_case_deadlines(&case.case_id).await?;
            let earliest_due = deadlines.iter().map(|d| d.due_at).min();

            match case.status {
                CaseStatus::Closed => {
                    closed += 1;
                    // Closure time is approximated by the last update; the
                    // store does not keep a dedicated closed_at column.
                    let on_time = match earliest_due {
                        Some(due) => case.updated_at <= due,
                        None => true,
                    };
                    if on_time {
                        closed_on_time += 1;
                    }
                }
                _ => {}
            }

            if case.status.is_open() {
                pending += 1;
                if deadlines.iter().any(|d| d.due_at < now) {
                    overdue += 1;
                }
            }
        }

        let total = cases.len();
        let rate = |n: usize| {
            if total == 0 {
                0.0
            } else {
                n as f64 / total as f64 * 100.0
            }
        };

        let report = ComplianceReport {
            period_start: start,
            period_end: end,
            total_cases: total,
            closed,
            closed_on_time,
            overdue,
            pending,
            compliance_rate: rate(closed),
            on_time_rate: rate(closed_on_time),
            generated_at: now,
        };

        info!(
            total = report.total_cases,
            closed = report.closed,
            overdue = report.overdue,
            compliance_rate = report.compliance_rate,
            "Compliance report generated"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Duration;
    use posh_core::types::{
        Case, CaseId, CasePriority, ComplianceDeadline, DeadlineId, DeadlineKind, DeadlineStatus,
        Urgency,
    };

    fn case_at(status: CaseStatus, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Case {
        Case {
            case_id: CaseId::generate(),
            case_number: "POSH-2026-000001".to_string(),
            title: "t".to_string(),
            description: String::new(),
            complainant_name: "A".to_string(),
            respondent_name: "B".to_string(),
            status,
            priority: CasePriority::Medium,
            evidence_score: 40,
            ai_analysis: None,
            metadata: serde_json::json!({}),
            created_at,
            updated_at,
        }
    }

    fn deadline_due(case_id: &CaseId, due_at: DateTime<Utc>) -> ComplianceDeadline {
        ComplianceDeadline {
            deadline_id: DeadlineId::generate(),
            case_id: case_id.clone(),
            kind: DeadlineKind::Investigation,
            due_at,
            status: DeadlineStatus::Pending,
            urgency: Urgency::Medium,
            description: None,
            alert_sent_at: None,
            created_at: due_at - Duration::days(90),
            completed_at: None,
        }
    }

    #[tokio::test]
    async fn test_empty_window_reports_zero_rates() {
        let store = Arc::new(MemoryStore::new());
        let reporter = ComplianceReporter::new(store);
        let now = Utc::now();

        let report = reporter.generate(now - Duration::days(30), now).await.unwrap();
        assert_eq!(report.total_cases, 0);
        assert_eq!(report.compliance_rate, 0.0);
        assert_eq!(report.on_time_rate, 0.0);
    }

    #[tokio::test]
    async fn test_rejects_inverted_window() {
        let store = Arc::new(MemoryStore::new());
        let reporter = ComplianceReporter::new(store);
        let now = Utc::now();
        assert!(reporter.generate(now, now - Duration::days(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_closed_and_closed_on_time_counted_separately() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let created = now - Duration::days(120);

        // Closed before its deadline lapsed.
        let on_time = case_at(CaseStatus::Closed, created, created + Duration::days(30));
        store.insert_case(&on_time).await.unwrap();
        store
            .insert_deadline(&deadline_due(&on_time.case_id, created + Duration::days(90)))
            .await
            .unwrap();

        // Closed, but after the deadline.
        let late = case_at(CaseStatus::Closed, created, created + Duration::days(100));
        store.insert_case(&late).await.unwrap();
        store
            .insert_deadline(&deadline_due(&late.case_id, created + Duration::days(90)))
            .await
            .unwrap();

        let reporter = ComplianceReporter::new(store);
        let report = reporter
            .generate(created - Duration::days(1), now)
            .await
            .unwrap();

        assert_eq!(report.total_cases, 2);
        assert_eq!(report.closed, 2);
        assert_eq!(report.closed_on_time, 1);
        assert_eq!(report.compliance_rate, 100.0);
        assert_eq!(report.on_time_rate, 50.0);
        assert_eq!(report.overdue, 0);
    }

    #[tokio::test]
    async fn test_open_case_with_lapsed_deadline_is_overdue() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let created = now - Duration::days(100);

        let open = case_at(CaseStatus::Investigating, created, created);
        store.insert_case(&open).await.unwrap();
        store
            .insert_deadline(&deadline_due(&open.case_id, now - Duration::days(10)))
            .await
            .unwrap();

        let pending = case_at(CaseStatus::Pending, created, created);
        store.insert_case(&pending).await.unwrap();
        store
            .insert_deadline(&deadline_due(&pending.case_id, now + Duration::days(10)))
            .await
            .unwrap();

        let reporter = ComplianceReporter::new(store);
        let report = reporter
            .generate(created - Duration::days(1), now)
            .await
            .unwrap();

        assert_eq!(report.total_cases, 2);
        assert_eq!(report.overdue, 1);
        assert_eq!(report.pending, 2);
        assert_eq!(report.closed, 0);
        assert_eq!(report.compliance_rate, 0.0);
    }

    #[tokio::test]
    async fn test_cases_outside_window_excluded() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();

        let inside = case_at(CaseStatus::Pending, now - Duration::days(5), now);
        let outside = case_at(CaseStatus::Pending, now - Duration::days(60), now);
        store.insert_case(&inside).await.unwrap();
        store.insert_case(&outside).await.unwrap();

        let reporter = ComplianceReporter::new(store);
        let report = reporter.generate(now - Duration::days(30), now).await.unwrap();
        assert_eq!(report.total_cases, 1);
    }
}
