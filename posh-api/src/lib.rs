//! POSH Case-Management API
//!
//! The HTTP surface of the compliance application: case and report
//! endpoints for operators, health probes, and the inbound callback
//! endpoints the workflow-automation service posts analysis results back
//! through.

pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use server::{create_server, run_server, start_background_server};
pub use state::{ApiConfig, AppState};
