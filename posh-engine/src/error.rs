//! Engine error types

use thiserror::Error;

/// Engine error
#[derive(Error, Debug)]
pub enum EngineError {
    /// Store query/insert/update failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Entity lookup failure
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Domain rule violation (status graph, credibility range)
    #[error(transparent)]
    Domain(#[from] posh_core::CoreError),

    /// Outbound network failure
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Engine result type
pub type EngineResult<T> = Result<T, EngineError>;

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Serialization(e.to_string())
    }
}
