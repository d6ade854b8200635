//! Domain types for the POSH compliance process

pub mod case;
pub mod deadline;
pub mod evidence;
pub mod review;
pub mod webhook;

pub use case::{Case, CaseId, CasePriority, CaseStatus, RiskLevel};
pub use deadline::{ComplianceDeadline, DeadlineId, DeadlineKind, DeadlineStatus, Urgency};
pub use evidence::{Evidence, EvidenceId, EvidenceKind};
pub use review::{HumanReview, ReviewId, ReviewPathway};
pub use webhook::{DeliveryStatus, EventKind, WebhookEvent, WebhookEventId};
