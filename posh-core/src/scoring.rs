//! Evidence scoring and urgency classification
//!
//! Pure functions shared by the case service (score, review flag, priority,
//! risk bucket) and the deadline monitor (urgency from days remaining).

use crate::types::{CasePriority, EvidenceKind, RiskLevel, Urgency};

/// Score below which a case requires expedited human review
pub const HUMAN_REVIEW_THRESHOLD: u32 = 40;

/// Evidence-score boundary between low and medium risk
pub const RISK_MEDIUM_THRESHOLD: u32 = 30;

/// Evidence-score boundary between medium and high risk
pub const RISK_HIGH_THRESHOLD: u32 = 60;

/// Per-kind evidence strength weight
pub fn evidence_weight(kind: EvidenceKind) -> u32 {
    match kind {
        EvidenceKind::Witness => 30,
        EvidenceKind::Document => 40,
        EvidenceKind::Physical => 50,
        EvidenceKind::Digital => 35,
    }
}

/// Summed strength score for a list of evidence items.
///
/// No cap and no diminishing returns across repeated kinds.
pub fn evidence_score(kinds: &[EvidenceKind]) -> u32 {
    kinds.iter().copied().map(evidence_weight).sum()
}

/// Whether a case with the given score needs expedited human review
pub fn needs_human_review(score: u32) -> bool {
    score < HUMAN_REVIEW_THRESHOLD
}

/// Default case priority at creation time
pub fn default_priority(score: u32) -> CasePriority {
    if score < HUMAN_REVIEW_THRESHOLD {
        CasePriority::High
    } else {
        CasePriority::Medium
    }
}

/// Risk bucket for the AI-analysis summary
pub fn risk_level(score: u32) -> RiskLevel {
    if score < RISK_MEDIUM_THRESHOLD {
        RiskLevel::Low
    } else if score < RISK_HIGH_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Urgency for the approaching-deadline branch, from whole days remaining.
///
/// Returns `None` outside the 7-day alerting window; the overdue branch is
/// always critical and does not go through this classification.
pub fn approach_urgency(days_remaining: i64) -> Option<Urgency> {
    match days_remaining {
        d if d < 0 => None,
        d if d <= 1 => Some(Urgency::Critical),
        d if d <= 3 => Some(Urgency::High),
        d if d <= 7 => Some(Urgency::Medium),
        _ => None,
    }
}

/// Simplified urgency pre-set used when inserting a new deadline
pub fn initial_urgency(days_from_now: i64) -> Urgency {
    if days_from_now <= 7 {
        Urgency::High
    } else {
        Urgency::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_weights() {
        assert_eq!(evidence_weight(EvidenceKind::Witness), 30);
        assert_eq!(evidence_weight(EvidenceKind::Document), 40);
        assert_eq!(evidence_weight(EvidenceKind::Physical), 50);
        assert_eq!(evidence_weight(EvidenceKind::Digital), 35);
    }

    #[test]
    fn test_score_sums_without_cap() {
        assert_eq!(evidence_score(&[]), 0);
        assert_eq!(
            evidence_score(&[EvidenceKind::Document, EvidenceKind::Document]),
            80
        );
        assert_eq!(
            evidence_score(&[
                EvidenceKind::Witness,
                EvidenceKind::Document,
                EvidenceKind::Physical,
                EvidenceKind::Digital,
            ]),
            155
        );
    }

    #[test]
    fn test_review_flag_threshold() {
        assert!(needs_human_review(0));
        assert!(needs_human_review(39));
        assert!(!needs_human_review(40));
        assert!(!needs_human_review(70));
    }

    #[test]
    fn test_default_priority() {
        assert_eq!(default_priority(39), CasePriority::High);
        assert_eq!(default_priority(40), CasePriority::Medium);
    }

    #[test]
    fn test_risk_buckets() {
        assert_eq!(risk_level(0), RiskLevel::Low);
        assert_eq!(risk_level(29), RiskLevel::Low);
        assert_eq!(risk_level(30), RiskLevel::Medium);
        assert_eq!(risk_level(59), RiskLevel::Medium);
        assert_eq!(risk_level(60), RiskLevel::High);
    }

    #[test]
    fn test_approach_urgency() {
        assert_eq!(approach_urgency(0), Some(Urgency::Critical));
        assert_eq!(approach_urgency(1), Some(Urgency::Critical));
        assert_eq!(approach_urgency(2), Some(Urgency::High));
        assert_eq!(approach_urgency(3), Some(Urgency::High));
        assert_eq!(approach_urgency(4), Some(Urgency::Medium));
        assert_eq!(approach_urgency(7), Some(Urgency::Medium));
        assert_eq!(approach_urgency(8), None);
        assert_eq!(approach_urgency(-1), None);
    }

    #[test]
    fn test_initial_urgency() {
        assert_eq!(initial_urgency(7), Urgency::High);
        assert_eq!(initial_urgency(8), Urgency::Medium);
        assert_eq!(initial_urgency(90), Urgency::Medium);
    }
}
