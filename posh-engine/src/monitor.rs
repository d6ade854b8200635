//! Deadline Monitor
//!
//! Periodically scans open compliance deadlines, classifies urgency, and
//! drives at most one alert dispatch per qualifying deadline per window.
//! Duplicate alerts are bounded by conditional store transitions, not by
//! in-process locking: the approaching branch claims Pending -> AlertSent
//! before dispatching, and a claim that affects zero rows means another scan
//! already handled the deadline.

use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use posh_core::scoring::{approach_urgency, initial_urgency};
use posh_core::types::{
    CaseId, ComplianceDeadline, DeadlineId, DeadlineKind, DeadlineStatus, Urgency,
};

use crate::config::MonitorConfig;
use crate::dispatch::{Dispatcher, EventPayload};
use crate::error::{EngineError, EngineResult};
use crate::store::CaseStore;

/// Result of one scan cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Approaching alerts dispatched
    pub alerted: usize,
    /// Deadlines newly marked overdue
    pub marked_overdue: usize,
    /// Deadlines skipped (already claimed, or outside the alert window)
    pub skipped: usize,
}

/// Deadline monitor
pub struct DeadlineMonitor {
    store: Arc<dyn CaseStore>,
    dispatcher: Arc<dyn Dispatcher>,
    config: MonitorConfig,
    running: Arc<AtomicBool>,
}

impl DeadlineMonitor {
    /// Create a new monitor
    pub fn new(
        store: Arc<dyn CaseStore>,
        dispatcher: Arc<dyn Dispatcher>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            store,
            dispatcher,
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Insert a new pending deadline for a case.
    ///
    /// The urgency pre-set uses the simplified classification (due within
    /// 7 days is high, otherwise medium); the live recompute during scans
    /// supersedes it.
    pub async fn create_deadline(
        &self,
        case_id: &CaseId,
        kind: DeadlineKind,
        days_from_now: i64,
        description: Option<String>,
    ) -> EngineResult<ComplianceDeadline> {
        if days_from_now < 0 {
            return Err(EngineError::Validation(
                "Deadline must be in the future".to_string(),
            ));
        }

        let now = Utc::now();
        let deadline = ComplianceDeadline {
            deadline_id: DeadlineId::generate(),
            case_id: case_id.clone(),
            kind,
            due_at: now + Duration::days(days_from_now),
            status: DeadlineStatus::Pending,
            urgency: initial_urgency(days_from_now),
            description,
            alert_sent_at: None,
            created_at: now,
            completed_at: None,
        };

        self.store.insert_deadline(&deadline).await?;
        info!(
            deadline_id = %deadline.deadline_id,
            case_id = %case_id,
            kind = kind.as_str(),
            days = days_from_now,
            "Deadline created"
        );
        Ok(deadline)
    }

    /// Standard investigation window, in days
    pub fn investigation_window_days(&self) -> i64 {
        self.config.investigation_window_days
    }

    /// All deadlines tied to a case
    pub async fn get_case_deadlines(
        &self,
        case_id: &CaseId,
    ) -> EngineResult<Vec<ComplianceDeadline>> {
        self.store.list_case_deadlines(case_id).await
    }

    /// All deadlines currently marked overdue
    pub async fn get_overdue_deadlines(&self) -> EngineResult<Vec<ComplianceDeadline>> {
        self.store.list_overdue_deadlines().await
    }

    /// Run one scan cycle over open deadlines.
    ///
    /// Re-entrant: the only mutable state is in the store, and both branches
    /// claim their status transition conditionally before acting, so a race
    /// between concurrent scans resolves to a single winner per deadline.
    pub async fn check_deadlines(&self) -> EngineResult<ScanSummary> {
        let now = Utc::now();
        let cutoff = now + Duration::days(self.config.fetch_window_days);
        let deadlines = self.store.list_open_deadlines(cutoff).await?;

        debug!(count = deadlines.len(), "Deadline scan started");

        let mut summary = ScanSummary::default();
        for deadline in deadlines {
            if deadline.is_past_due(now) {
                if self.handle_overdue(&deadline, now).await? {
                    summary.marked_overdue += 1;
                } else {
                    summary.skipped += 1;
                }
            } else if deadline.status == DeadlineStatus::Pending {
                match self.handle_approaching(&deadline, now).await? {
                    true => summary.alerted += 1,
                    false => summary.skipped += 1,
                }
            } else {
                // AlertSent and not yet due: already alerted for this window.
                summary.skipped += 1;
            }
        }

        info!(
            alerted = summary.alerted,
            marked_overdue = summary.marked_overdue,
            skipped = summary.skipped,
            "Deadline scan complete"
        );
        Ok(summary)
    }

    /// Overdue branch: mark first, then alert. Marking is not conditioned on
    /// delivery success since the deadline has already lapsed.
    async fn handle_overdue(
        &self,
        deadline: &ComplianceDeadline,
        now: DateTime<Utc>,
    ) -> EngineResult<bool> {
        let claimed = self.store.mark_overdue(&deadline.deadline_id, now).await?;
        if !claimed {
            debug!(deadline_id = %deadline.deadline_id, "Overdue already handled, skipping");
            return Ok(false);
        }

        warn!(
            deadline_id = %deadline.deadline_id,
            case_id = %deadline.case_id,
            due_at = %deadline.due_at,
            "Deadline overdue"
        );

        self.dispatch_alert(deadline, Urgency::Critical, now).await;
        Ok(true)
    }

    /// Approaching branch: claim the Pending row, then dispatch with the
    /// urgency derived from days remaining. Outside the 7-day window the
    /// deadline is left untouched.
    async fn handle_approaching(
        &self,
        deadline: &ComplianceDeadline,
        now: DateTime<Utc>,
    ) -> EngineResult<bool> {
        let days = deadline.days_remaining(now);
        let Some(urgency) = approach_urgency(days) else {
            return Ok(false);
        };
        if days > self.config.approach_window_days {
            return Ok(false);
        }

        let claimed = self
            .store
            .mark_alert_sent(&deadline.deadline_id, now)
            .await?;
        if !claimed {
            debug!(deadline_id = %deadline.deadline_id, "Alert already claimed, skipping");
            return Ok(false);
        }

        self.dispatch_alert(deadline, urgency, now).await;
        Ok(true)
    }

    /// Build and send the deadline_approaching event, joining case context.
    /// Dispatch failure is non-fatal: the durable status transition has
    /// already been recorded.
    async fn dispatch_alert(&self, deadline: &ComplianceDeadline, urgency: Urgency, now: DateTime<Utc>) {
        let (case_number, case_title) = match self.store.get_case(&deadline.case_id).await {
            Ok(Some(case)) => (case.case_number, case.title),
            Ok(None) => {
                warn!(
                    deadline_id = %deadline.deadline_id,
                    case_id = %deadline.case_id,
                    "Deadline references missing case"
                );
                (String::new(), String::new())
            }
            Err(e) => {
                error!(
                    deadline_id = %deadline.deadline_id,
                    error = %e,
                    "Failed to load case context for alert"
                );
                (String::new(), String::new())
            }
        };

        let outcome = self
            .dispatcher
            .dispatch(EventPayload::DeadlineApproaching {
                case_id: deadline.case_id.clone(),
                deadline_id: deadline.deadline_id.clone(),
                deadline_kind: deadline.kind,
                due_at: deadline.due_at,
                urgency,
                days_remaining: deadline.days_remaining(now),
                case_number,
                case_title,
            })
            .await;

        if !outcome.success {
            warn!(
                deadline_id = %deadline.deadline_id,
                urgency = urgency.as_str(),
                error = outcome.error.as_deref().unwrap_or(""),
                "Deadline alert delivery failed"
            );
        }
    }

    /// Sweep open cases and insert the standard investigation deadline for
    /// any case that lost its own to a partial-failure creation.
    pub async fn reconcile_missing_deadlines(&self) -> EngineResult<usize> {
        let case_ids = self.store.list_open_case_ids().await?;
        let mut created = 0;

        for case_id in case_ids {
            let deadlines = self.store.list_case_deadlines(&case_id).await?;
            let has_investigation = deadlines
                .iter()
                .any(|d| d.kind == DeadlineKind::Investigation);
            if has_investigation {
                continue;
            }

            self.create_deadline(
                &case_id,
                DeadlineKind::Investigation,
                self.config.investigation_window_days,
                Some("Reconciled investigation window".to_string()),
            )
            .await?;
            created += 1;
        }

        if created > 0 {
            info!(count = created, "Reconciled cases missing deadlines");
        }
        Ok(created)
    }

    /// Start the recurring scan. Idempotent: a second call while running is
    /// a no-op. The first scan fires after a short startup delay, then once
    /// per configured interval.
    pub fn start_monitoring(self: &Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Deadline monitor already running");
            return;
        }

        let monitor = Arc::clone(self);
        let startup_delay = std::time::Duration::from_secs(self.config.startup_delay_secs);
        let scan_interval = std::time::Duration::from_secs(self.config.scan_interval_secs);

        tokio::spawn(async move {
            info!(
                interval_secs = monitor.config.scan_interval_secs,
                "Deadline monitor started"
            );

            tokio::time::sleep(startup_delay).await;

            // The first tick completes immediately, giving one scan right
            // after the startup delay.
            let mut ticker = interval(scan_interval);
            // Stopping is checked at tick boundaries only; an in-flight scan
            // runs to completion, but a stop issued while waiting for the
            // next tick must not let that tick start a new scan.
            loop {
                ticker.tick().await;
                if !monitor.running.load(Ordering::SeqCst) {
                    break;
                }

                if let Err(e) = monitor.check_deadlines().await {
                    error!(error = %e, "Deadline scan failed");
                }
                if let Err(e) = monitor.reconcile_missing_deadlines().await {
                    error!(error = %e, "Deadline reconciliation failed");
                }
            }

            info!("Deadline monitor stopped");
        });
    }

    /// Stop the recurring scan. Cancels future ticks only.
    pub fn stop_monitoring(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the recurring scan is active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::RecordingDispatcher;
    use crate::store::MemoryStore;
    use posh_core::types::{Case, CasePriority, CaseStatus, EventKind};

    fn sample_case() -> Case {
        let now = Utc::now();
        Case {
            case_id: CaseId::generate(),
            case_number: "POSH-2026-000123".to_string(),
            title: "Test complaint".to_string(),
            description: String::new(),
            complainant_name: "A".to_string(),
            respondent_name: "B".to_string(),
            status: CaseStatus::Pending,
            priority: CasePriority::Medium,
            evidence_score: 70,
            ai_analysis: None,
            metadata: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        }
    }

    fn fixture() -> (Arc<MemoryStore>, Arc<RecordingDispatcher>, DeadlineMonitor) {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let monitor = DeadlineMonitor::new(
            store.clone(),
            dispatcher.clone(),
            MonitorConfig::default(),
        );
        (store, dispatcher, monitor)
    }

    #[tokio::test]
    async fn test_approaching_deadline_alerted_once() {
        let (store, dispatcher, monitor) = fixture();
        let case = sample_case();
        store.insert_case(&case).await.unwrap();

        let deadline = monitor
            .create_deadline(&case.case_id, DeadlineKind::Investigation, 2, None)
            .await
            .unwrap();

        let summary = monitor.check_deadlines().await.unwrap();
        assert_eq!(summary.alerted, 1);
        assert_eq!(dispatcher.count(EventKind::DeadlineApproaching).await, 1);

        let stored = store.get_deadline(&deadline.deadline_id).await.unwrap().unwrap();
        assert_eq!(stored.status, DeadlineStatus::AlertSent);

        // Second scan with no state change: no further dispatch.
        let summary = monitor.check_deadlines().await.unwrap();
        assert_eq!(summary.alerted, 0);
        assert_eq!(dispatcher.count(EventKind::DeadlineApproaching).await, 1);
    }

    #[tokio::test]
    async fn test_two_day_deadline_gets_high_urgency() {
        let (store, dispatcher, monitor) = fixture();
        let case = sample_case();
        store.insert_case(&case).await.unwrap();

        // Mid-band due date so day truncation cannot move it to another tier.
        let now = Utc::now();
        let deadline = ComplianceDeadline {
            deadline_id: DeadlineId::generate(),
            case_id: case.case_id.clone(),
            kind: DeadlineKind::Investigation,
            due_at: now + Duration::days(2) + Duration::hours(12),
            status: DeadlineStatus::Pending,
            urgency: Urgency::High,
            description: None,
            alert_sent_at: None,
            created_at: now,
            completed_at: None,
        };
        store.insert_deadline(&deadline).await.unwrap();

        monitor.check_deadlines().await.unwrap();

        let events = dispatcher.events().await;
        match &events[0] {
            EventPayload::DeadlineApproaching { urgency, .. } => {
                assert_eq!(*urgency, Urgency::High)
            }
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_alert_sent_deadline_goes_overdue_when_lapsed() {
        let (store, dispatcher, monitor) = fixture();
        let case = sample_case();
        store.insert_case(&case).await.unwrap();

        // Due 3 days ago, already alerted in an earlier window.
        let now = Utc::now();
        let deadline = ComplianceDeadline {
            deadline_id: DeadlineId::generate(),
            case_id: case.case_id.clone(),
            kind: DeadlineKind::Investigation,
            due_at: now - Duration::days(3),
            status: DeadlineStatus::AlertSent,
            urgency: Urgency::High,
            description: None,
            alert_sent_at: Some(now - Duration::days(5)),
            created_at: now - Duration::days(10),
            completed_at: None,
        };
        store.insert_deadline(&deadline).await.unwrap();

        let summary = monitor.check_deadlines().await.unwrap();
        assert_eq!(summary.marked_overdue, 1);

        let events = dispatcher.events().await;
        match &events[0] {
            EventPayload::DeadlineApproaching { urgency, .. } => {
                assert_eq!(*urgency, Urgency::Critical)
            }
            other => panic!("Unexpected event: {:?}", other),
        }

        let stored = store.get_deadline(&deadline.deadline_id).await.unwrap().unwrap();
        assert_eq!(stored.status, DeadlineStatus::Overdue);

        // Overdue is terminal for the monitor.
        let summary = monitor.check_deadlines().await.unwrap();
        assert_eq!(summary.marked_overdue, 0);
        assert_eq!(dispatcher.count(EventKind::DeadlineApproaching).await, 1);
    }

    #[tokio::test]
    async fn test_overdue_marked_even_when_delivery_fails() {
        let (store, dispatcher, monitor) = fixture();
        let case = sample_case();
        store.insert_case(&case).await.unwrap();
        dispatcher.fail_dispatches(true);

        let now = Utc::now();
        let deadline = ComplianceDeadline {
            deadline_id: DeadlineId::generate(),
            case_id: case.case_id.clone(),
            kind: DeadlineKind::Resolution,
            due_at: now - Duration::days(1),
            status: DeadlineStatus::Pending,
            urgency: Urgency::High,
            description: None,
            alert_sent_at: None,
            created_at: now - Duration::days(8),
            completed_at: None,
        };
        store.insert_deadline(&deadline).await.unwrap();

        let summary = monitor.check_deadlines().await.unwrap();
        assert_eq!(summary.marked_overdue, 1);

        let stored = store.get_deadline(&deadline.deadline_id).await.unwrap().unwrap();
        assert_eq!(stored.status, DeadlineStatus::Overdue);
        assert!(stored.alert_sent_at.is_some());
    }

    #[tokio::test]
    async fn test_deadline_outside_window_not_alerted() {
        let (store, dispatcher, monitor) = fixture();
        let case = sample_case();
        store.insert_case(&case).await.unwrap();
        monitor
            .create_deadline(&case.case_id, DeadlineKind::Reporting, 10, None)
            .await
            .unwrap();

        let summary = monitor.check_deadlines().await.unwrap();
        assert_eq!(summary.alerted, 0);
        assert_eq!(dispatcher.count(EventKind::DeadlineApproaching).await, 0);
    }

    #[tokio::test]
    async fn test_reconcile_creates_missing_investigation_deadline() {
        let (store, _dispatcher, monitor) = fixture();
        let with_deadline = sample_case();
        let without_deadline = sample_case();
        store.insert_case(&with_deadline).await.unwrap();
        store.insert_case(&without_deadline).await.unwrap();
        monitor
            .create_deadline(&with_deadline.case_id, DeadlineKind::Investigation, 90, None)
            .await
            .unwrap();

        let created = monitor.reconcile_missing_deadlines().await.unwrap();
        assert_eq!(created, 1);

        let deadlines = monitor
            .get_case_deadlines(&without_deadline.case_id)
            .await
            .unwrap();
        assert_eq!(deadlines.len(), 1);
        assert_eq!(deadlines[0].kind, DeadlineKind::Investigation);

        // Re-running the sweep is a no-op.
        assert_eq!(monitor.reconcile_missing_deadlines().await.unwrap(), 0);
        assert_eq!(
            monitor
                .get_case_deadlines(&with_deadline.case_id)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_start_stop_idempotent() {
        let (_store, _dispatcher, monitor) = fixture();
        let monitor = Arc::new(monitor);

        assert!(!monitor.is_running());
        monitor.start_monitoring();
        assert!(monitor.is_running());
        // Second start is a no-op.
        monitor.start_monitoring();
        assert!(monitor.is_running());

        monitor.stop_monitoring();
        assert!(!monitor.is_running());
        monitor.stop_monitoring();
        assert!(!monitor.is_running());
    }

    #[tokio::test]
    async fn test_stop_cancels_next_scheduled_scan() {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = Arc::new(RecordingDispatcher::new());
        let config = MonitorConfig {
            scan_interval_secs: 1,
            startup_delay_secs: 0,
            ..MonitorConfig::default()
        };
        let monitor = Arc::new(DeadlineMonitor::new(
            store.clone(),
            dispatcher.clone(),
            config,
        ));

        let case = sample_case();
        store.insert_case(&case).await.unwrap();

        monitor.start_monitoring();
        // Let the initial scan run, then stop while the loop is waiting
        // for its next tick.
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        monitor.stop_monitoring();

        // This deadline qualifies for an alert, but no scan after the stop
        // may pick it up.
        let deadline = monitor
            .create_deadline(&case.case_id, DeadlineKind::Resolution, 2, None)
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;

        assert_eq!(dispatcher.count(EventKind::DeadlineApproaching).await, 0);
        let stored = store.get_deadline(&deadline.deadline_id).await.unwrap().unwrap();
        assert_eq!(stored.status, DeadlineStatus::Pending);
    }
}
