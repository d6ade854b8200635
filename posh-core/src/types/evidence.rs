//! Evidence types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::case::CaseId;
use crate::error::{CoreError, CoreResult};

/// Evidence identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvidenceId(pub String);

impl EvidenceId {
    pub fn generate() -> Self {
        Self(format!("evidence:{}", uuid::Uuid::new_v4()))
    }
}

impl std::fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of supporting material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    Document,
    Witness,
    Physical,
    Digital,
}

impl EvidenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Witness => "witness",
            Self::Physical => "physical",
            Self::Digital => "digital",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "document" => Ok(Self::Document),
            "witness" => Ok(Self::Witness),
            "physical" => Ok(Self::Physical),
            "digital" => Ok(Self::Digital),
            _ => Err(CoreError::UnknownValue {
                kind: "evidence kind",
                value: s.to_string(),
            }),
        }
    }
}

/// One item of supporting material attached to a case.
///
/// Identity is immutable once created; the AI analysis fields are mutable by
/// re-analysis callbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub evidence_id: EvidenceId,
    pub case_id: CaseId,
    pub kind: EvidenceKind,
    pub description: String,
    /// Reference to an uploaded file, when one exists
    pub file_ref: Option<String>,
    /// Score written back by the external analysis pipeline
    pub ai_score: Option<u32>,
    /// Credibility rating written back by the external analysis pipeline
    pub credibility: Option<u8>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
