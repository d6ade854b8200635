//! POSH Case-Management Core
//!
//! Domain types and pure computation for workplace-harassment complaint
//! handling: cases, evidence, compliance deadlines, human reviews, and the
//! evidence-scoring / urgency-classification logic shared by the engine.
//!
//! This crate performs no I/O; the engine crate owns the store seam, the
//! webhook dispatcher, and the deadline monitor.

pub mod case_number;
pub mod error;
pub mod scoring;
pub mod types;

pub use error::{CoreError, CoreResult};
