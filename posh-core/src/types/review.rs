//! Human review types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::case::{CaseId, CaseStatus};
use crate::error::{CoreError, CoreResult};

/// Review identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub String);

impl ReviewId {
    pub fn generate() -> Self {
        Self(format!("review:{}", uuid::Uuid::new_v4()))
    }
}

impl std::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recommended investigation pathway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPathway {
    Formal,
    Mediation,
    Alternative,
    Dismiss,
}

impl ReviewPathway {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Mediation => "mediation",
            Self::Alternative => "alternative",
            Self::Dismiss => "dismiss",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "formal" => Ok(Self::Formal),
            "mediation" => Ok(Self::Mediation),
            "alternative" => Ok(Self::Alternative),
            "dismiss" => Ok(Self::Dismiss),
            _ => Err(CoreError::UnknownValue {
                kind: "review pathway",
                value: s.to_string(),
            }),
        }
    }

    /// Case status this pathway drives the case into
    pub fn target_status(&self) -> CaseStatus {
        match self {
            Self::Formal => CaseStatus::Investigating,
            Self::Mediation => CaseStatus::Mediation,
            Self::Alternative => CaseStatus::UnderReview,
            Self::Dismiss => CaseStatus::Closed,
        }
    }
}

/// A reviewer's formal decision on a case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanReview {
    pub review_id: ReviewId,
    pub case_id: CaseId,
    pub reviewer_id: String,
    pub reviewer_role: String,
    /// Credibility assessment, 1-5
    pub credibility: u8,
    pub pathway: ReviewPathway,
    pub rationale: String,
    pub created_at: DateTime<Utc>,
}

impl HumanReview {
    /// Validate the credibility range
    pub fn validate(&self) -> CoreResult<()> {
        if !(1..=5).contains(&self.credibility) {
            return Err(CoreError::Validation(format!(
                "Credibility must be 1-5, got {}",
                self.credibility
            )));
        }
        Ok(())
    }
}
