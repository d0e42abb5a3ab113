//! Cloud API error types

use thiserror::Error;

/// Errors surfaced by a [`CloudApi`](crate::CloudApi) implementation.
///
/// The orchestrator treats all of these as opaque failures; the variants
/// only exist so log lines can say what went wrong.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Pagination cursor '{0}' was returned twice")]
    RepeatedCursor(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
