//! Case types
//!
//! A case is one filed workplace complaint moving through the POSH process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Case identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

impl CaseId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(format!("case:{}", uuid::Uuid::new_v4()))
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Case lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Newly filed, awaiting triage
    Pending,
    /// Under committee review
    UnderReview,
    /// Formal investigation in progress
    Investigating,
    /// Mediation pathway
    Mediation,
    /// Escalated for urgent handling
    Escalated,
    /// Closed
    Closed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::UnderReview => "under_review",
            Self::Investigating => "investigating",
            Self::Mediation => "mediation",
            Self::Escalated => "escalated",
            Self::Closed => "closed",
        }
    }

    /// Parse from string (for external input)
    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "under_review" => Ok(Self::UnderReview),
            "investigating" => Ok(Self::Investigating),
            "mediation" => Ok(Self::Mediation),
            "escalated" => Ok(Self::Escalated),
            "closed" => Ok(Self::Closed),
            _ => Err(CoreError::UnknownValue {
                kind: "case status",
                value: s.to_string(),
            }),
        }
    }

    /// Whether the case is still open
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Check transition validity.
    ///
    /// Pending -> {UnderReview, Investigating, Mediation} -> Closed, with
    /// Escalated reachable from any open state. Closed is terminal.
    pub fn can_transition_to(&self, next: CaseStatus) -> bool {
        if *self == next {
            return false;
        }
        match self {
            Self::Closed => false,
            _ if next == Self::Escalated => true,
            Self::Pending => matches!(
                next,
                Self::UnderReview | Self::Investigating | Self::Mediation | Self::Closed
            ),
            Self::UnderReview | Self::Investigating | Self::Mediation | Self::Escalated => {
                matches!(
                    next,
                    Self::UnderReview | Self::Investigating | Self::Mediation | Self::Closed
                )
            }
        }
    }

    /// Validate a transition, returning an error when the edge is not in the
    /// status graph.
    pub fn transition_to(&self, next: CaseStatus) -> CoreResult<CaseStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: *self,
                to: next,
            })
        }
    }
}

/// Case priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasePriority {
    Low,
    Medium,
    High,
    Critical,
}

impl CasePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl Default for CasePriority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Risk bucket derived from the evidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A filed complaint record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub case_id: CaseId,
    /// Human-readable number, `POSH-<year>-<6 digits>`
    pub case_number: String,
    pub title: String,
    pub description: String,
    pub complainant_name: String,
    pub respondent_name: String,
    pub status: CaseStatus,
    pub priority: CasePriority,
    /// Summed evidence strength score
    pub evidence_score: u32,
    /// Opaque AI-analysis blob written back by the automation callbacks
    pub ai_analysis: Option<serde_json::Value>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
