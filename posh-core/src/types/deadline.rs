//! Compliance deadline types
//!
//! A deadline is a compliance-driven due date tied to one case, e.g. the
//! 90-day investigation window. Status moves monotonically
//! Pending -> {AlertSent | Overdue} -> Completed; a Completed deadline is
//! never re-alerted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::case::CaseId;
use crate::error::{CoreError, CoreResult};

/// Deadline identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeadlineId(pub String);

impl DeadlineId {
    pub fn generate() -> Self {
        Self(format!("deadline:{}", uuid::Uuid::new_v4()))
    }
}

impl std::fmt::Display for DeadlineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deadline obligation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
    Filing,
    Investigation,
    Resolution,
    Reporting,
}

impl DeadlineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filing => "filing",
            Self::Investigation => "investigation",
            Self::Resolution => "resolution",
            Self::Reporting => "reporting",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "filing" => Ok(Self::Filing),
            "investigation" => Ok(Self::Investigation),
            "resolution" => Ok(Self::Resolution),
            "reporting" => Ok(Self::Reporting),
            _ => Err(CoreError::UnknownValue {
                kind: "deadline kind",
                value: s.to_string(),
            }),
        }
    }
}

/// Deadline status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    /// Awaiting its alert window
    Pending,
    /// Approaching-alert dispatched for the current window
    AlertSent,
    /// Due date lapsed
    Overdue,
    /// Obligation met; terminal
    Completed,
}

impl DeadlineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AlertSent => "alert_sent",
            Self::Overdue => "overdue",
            Self::Completed => "completed",
        }
    }

    /// Whether the monitor may still act on this deadline
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::AlertSent)
    }
}

/// Derived closeness-to-lapse classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// A deadline obligation tied to one case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceDeadline {
    pub deadline_id: DeadlineId,
    pub case_id: CaseId,
    pub kind: DeadlineKind,
    pub due_at: DateTime<Utc>,
    pub status: DeadlineStatus,
    pub urgency: Urgency,
    pub description: Option<String>,
    pub alert_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ComplianceDeadline {
    /// Days until the due date, rounded up so a deadline due in 47 hours
    /// still counts as 2 days out. Negative once lapsed by a full day.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        let secs = (self.due_at - now).num_seconds();
        (secs + 86_399).div_euclid(86_400)
    }

    /// Whether the due date has passed
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn deadline_due(due_at: DateTime<Utc>) -> ComplianceDeadline {
        ComplianceDeadline {
            deadline_id: DeadlineId::generate(),
            case_id: CaseId("case:1".to_string()),
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

    #[test]
    fn test_days_remaining_rounds_up() {
        let now = Utc::now();
        let d = deadline_due(now + Duration::days(2) - Duration::seconds(1));
        assert_eq!(d.days_remaining(now), 2);

        let d = deadline_due(now + Duration::days(1));
        assert_eq!(d.days_remaining(now), 1);

        let d = deadline_due(now);
        assert_eq!(d.days_remaining(now), 0);

        let d = deadline_due(now - Duration::days(3));
        assert_eq!(d.days_remaining(now), -3);
    }

    #[test]
    fn test_open_statuses() {
        assert!(DeadlineStatus::Pending.is_open());
        assert!(DeadlineStatus::AlertSent.is_open());
        assert!(!DeadlineStatus::Overdue.is_open());
        assert!(!DeadlineStatus::Completed.is_open());
    }
}
