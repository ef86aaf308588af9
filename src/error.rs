//! Error types for cadre
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in cadre
#[derive(Debug, Error)]
pub enum CadreError {
    /// A cycle report was not durably written
    #[error("Handoff failed for cycle {cycle}: {reason}")]
    Handoff { cycle: u32, reason: String },

    /// Model call boundary raised; fatal to the current step
    #[error("LLM error: {0}")]
    Llm(String),

    /// Invalid state or configuration
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Script interpreter could not be spawned
    #[error("Interpreter error: {0}")]
    Interpreter(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for cadre operations
pub type Result<T> = std::result::Result<T, CadreError>;
