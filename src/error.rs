//! Error types for Redator
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Redator
#[derive(Debug, Error)]
pub enum RedatorError {
    /// No valid session, or the session does not own the resource
    #[error("Unauthorized")]
    Unauthorized,

    /// Topic or task not found in storage
    #[error("Not found: {0}")]
    NotFound(String),

    /// User-correctable input problem; the message is shown verbatim
    #[error("{0}")]
    ValidationFailed(String),

    /// Completion provider failed or replied with an unusable shape
    #[error("Provider error: {0}")]
    Provider(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Prompt or page template failed to render
    #[error("Template error: {0}")]
    Template(String),

    /// Office document could not be serialized
    #[error("Document error: {0}")]
    Document(String),

    /// Missing or invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RedatorError {
    /// Message that is safe to show to the end user.
    ///
    /// Provider and infrastructure details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            RedatorError::Unauthorized => "Unauthorized".to_string(),
            RedatorError::NotFound(_) => "Data not found".to_string(),
            RedatorError::ValidationFailed(msg) => msg.clone(),
            RedatorError::Provider(_) => "AI response failed — check credentials/balance".to_string(),
            _ => "Internal error".to_string(),
        }
    }
}

/// Result type alias for Redator operations
pub type Result<T> = std::result::Result<T, RedatorError>;
