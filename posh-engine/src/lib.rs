//! POSH Case-Management Engine
//!
//! The client-side orchestration layer of the compliance application:
//!
//! - [`dispatch`] — outbound webhook dispatcher: one HTTP POST per business
//!   event, uniform `{success, error}` outcomes, write-once audit records.
//! - [`monitor`] — deadline monitor: hourly scans that classify urgency,
//!   drive at most one alert per deadline per window, and mark lapsed
//!   deadlines overdue.
//! - [`cases`] — case lifecycle service: creation sequence, evidence upload
//!   with score recompute, validated status transitions, review submission.
//! - [`report`] — on-demand compliance aggregation over a date range.
//! - [`store`] — the external relational store seam and an in-memory
//!   implementation for tests and local development.

pub mod cases;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod monitor;
pub mod report;
pub mod store;

pub use cases::{CaseService, CreatedCase, NewCaseInput, NewEvidenceInput};
pub use config::{MonitorConfig, WebhookConfig};
pub use dispatch::{DispatchOutcome, Dispatcher, EventPayload, WebhookDispatcher};
pub use error::{EngineError, EngineResult};
pub use monitor::{DeadlineMonitor, ScanSummary};
pub use report::{ComplianceReport, ComplianceReporter};
pub use store::{CaseStore, MemoryStore};
