//! End-to-end lifecycle tests over the in-memory store with a recording
//! dispatcher: filing, review, evidence, deadline scans and reporting
//! working against the same store.

use std::sync::Arc;

use chrono::{Duration, Utc};
use posh_core::types::{CasePriority, CaseStatus, DeadlineKind, DeadlineStatus, EvidenceKind, EventKind, RiskLevel};
use posh_engine::dispatch::RecordingDispatcher;
use posh_engine::{
    CaseService, ComplianceReporter, DeadlineMonitor, MemoryStore, MonitorConfig, NewCaseInput,
    NewEvidenceInput,
};

struct Harness {
    store: Arc<MemoryStore>,
    dispatcher: Arc<RecordingDispatcher>,
    monitor: Arc<DeadlineMonitor>,
    cases: CaseService,
    reporter: ComplianceReporter,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let monitor = Arc::new(DeadlineMonitor::new(
        store.clone(),
        dispatcher.clone(),
        MonitorConfig::default(),
    ));
    let cases = CaseService::new(store.clone(), dispatcher.clone(), monitor.clone());
    let reporter = ComplianceReporter::new(store.clone());
    Harness {
        store,
        dispatcher,
        monitor,
        cases,
        reporter,
    }
}

fn filing(evidence: Vec<EvidenceKind>) -> NewCaseInput {
    NewCaseInput {
        title: "Complaint".to_string(),
        description: "Filed through the intake portal".to_string(),
        complainant_name: "Complainant".to_string(),
        respondent_name: "Respondent".to_string(),
        evidence: evidence
            .into_iter()
            .map(|kind| NewEvidenceInput {
                kind,
                description: kind.as_str().to_string(),
                file_ref: None,
            })
            .collect(),
        metadata: None,
    }
}

#[tokio::test]
async fn test_filing_produces_scored_case_with_deadline_and_audit() {
    let h = harness();

    let created = h
        .cases
        .create_case(filing(vec![EvidenceKind::Witness, EvidenceKind::Document]))
        .await
        .unwrap();

    assert_eq!(created.case.evidence_score, 70);
    assert_eq!(created.case.priority, CasePriority::Medium);
    assert!(!created.needs_human_review);
    assert_eq!(created.risk_level, RiskLevel::High);

    let deadlines = h.monitor.get_case_deadlines(&created.case.case_id).await.unwrap();
    assert_eq!(deadlines.len(), 1);
    assert_eq!(deadlines[0].kind, DeadlineKind::Investigation);
    assert_eq!(deadlines[0].status, DeadlineStatus::Pending);
    // 90-day statutory window, allowing for day truncation.
    let days = deadlines[0].days_remaining(Utc::now());
    assert!((89..=90).contains(&days), "unexpected window: {} days", days);

    assert_eq!(h.dispatcher.count(EventKind::CaseCreated).await, 1);
}

#[tokio::test]
async fn test_full_case_journey_to_closure() {
    let h = harness();

    let created = h
        .cases
        .create_case(filing(vec![EvidenceKind::Witness]))
        .await
        .unwrap();
    let case_id = created.case.case_id.clone();
    assert!(created.needs_human_review);

    // Committee review routes the weak case into formal investigation.
    h.cases
        .submit_review(
            &case_id,
            "member-1".to_string(),
            "presiding_officer".to_string(),
            3,
            posh_core::types::ReviewPathway::Formal,
            "Needs a full inquiry".to_string(),
        )
        .await
        .unwrap();
    assert_eq!(h.cases.get_case(&case_id).await.unwrap().status, CaseStatus::Investigating);

    // Late evidence strengthens the case.
    h.cases
        .add_evidence(
            &case_id,
            NewEvidenceInput {
                kind: EvidenceKind::Digital,
                description: "Chat export".to_string(),
                file_ref: Some("s3://evidence/chat.zip".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(h.cases.get_case(&case_id).await.unwrap().evidence_score, 65);

    // Investigation concludes.
    h.cases
        .update_status(&case_id, CaseStatus::Closed, Some("member-1".to_string()))
        .await
        .unwrap();
    assert_eq!(h.cases.get_case(&case_id).await.unwrap().status, CaseStatus::Closed);

    // Every step announced, every dispatch audited.
    assert_eq!(h.dispatcher.count(EventKind::CaseCreated).await, 1);
    assert_eq!(h.dispatcher.count(EventKind::HumanReviewSubmitted).await, 1);
    assert_eq!(h.dispatcher.count(EventKind::EvidenceUploaded).await, 1);
    assert_eq!(h.dispatcher.count(EventKind::CaseStatusChanged).await, 2);
}

#[tokio::test]
async fn test_scan_then_report_reflect_same_store() {
    use posh_engine::store::CaseStore;

    let h = harness();

    let created = h
        .cases
        .create_case(filing(vec![EvidenceKind::Document]))
        .await
        .unwrap();
    let case_id = created.case.case_id.clone();

    // Force the investigation deadline into the past.
    let deadlines = h.monitor.get_case_deadlines(&case_id).await.unwrap();
    let mut lapsed = deadlines[0].clone();
    lapsed.deadline_id = posh_core::types::DeadlineId::generate();
    lapsed.due_at = Utc::now() - Duration::days(5);
    h.store.insert_deadline(&lapsed).await.unwrap();

    let summary = h.monitor.check_deadlines().await.unwrap();
    assert_eq!(summary.marked_overdue, 1);
    assert_eq!(h.monitor.get_overdue_deadlines().await.unwrap().len(), 1);

    let report = h
        .reporter
        .generate(Utc::now() - Duration::days(1), Utc::now() + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(report.total_cases, 1);
    assert_eq!(report.overdue, 1);
    assert_eq!(report.pending, 1);
    assert_eq!(report.closed, 0);
}

#[tokio::test]
async fn test_reconcile_repairs_partial_creation() {
    use posh_engine::store::CaseStore;

    let h = harness();

    // A case that lost its deadline, inserted behind the service's back.
    let now = Utc::now();
    let orphan = posh_core::types::Case {
        case_id: posh_core::types::CaseId::generate(),
        case_number: "POSH-2026-000777".to_string(),
        title: "Orphaned".to_string(),
        description: String::new(),
        complainant_name: "A".to_string(),
        respondent_name: "B".to_string(),
        status: CaseStatus::Pending,
        priority: CasePriority::Medium,
        evidence_score: 0,
        ai_analysis: None,
        metadata: serde_json::json!({}),
        created_at: now,
        updated_at: now,
    };
    h.store.insert_case(&orphan).await.unwrap();

    assert_eq!(h.monitor.reconcile_missing_deadlines().await.unwrap(), 1);
    let deadlines = h.monitor.get_case_deadlines(&orphan.case_id).await.unwrap();
    assert_eq!(deadlines.len(), 1);
    assert_eq!(deadlines[0].kind, DeadlineKind::Investigation);
}
