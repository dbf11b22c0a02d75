//! Cloud agent client errors

use thiserror::Error;

/// Errors that can occur when interacting with the cloud agent API
#[derive(Debug, Error)]
pub enum FabricError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Cloud agent returned an error
    #[error("cloud agent error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid token, expired, etc.)
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (e.g., missing required fields)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl FabricError {
    /// True when the error means the resource does not currently exist.
    ///
    /// Callers use this to distinguish the expected absent case from real
    /// failures; the reconciliation services absorb it on delete and treat
    /// it as the create trigger on reconcile.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FabricError::NotFound(_))
    }
}
