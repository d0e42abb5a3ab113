//! Vultr binding error types

use prenv_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VultrError {
    #[error("Vultr API key is empty")]
    MissingApiKey,

    #[error("Vultr rejected the API key ({status}): {message}")]
    AuthenticationFailed { status: u16, message: String },

    #[error("Vultr resource not found: {0}")]
    NotFound(String),

    #[error("Vultr API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl VultrError {
    /// Classify a non-success HTTP response
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => VultrError::AuthenticationFailed { status, message },
            404 => VultrError::NotFound(message),
            _ => VultrError::ApiError { status, message },
        }
    }
}

impl From<VultrError> for CloudError {
    fn from(err: VultrError) -> Self {
        match err {
            VultrError::MissingApiKey => CloudError::InvalidConfig(err.to_string()),
            VultrError::AuthenticationFailed { .. } => {
                CloudError::AuthenticationFailed(err.to_string())
            }
            VultrError::NotFound(message) => CloudError::ResourceNotFound(message),
            VultrError::ApiError { status, message } => CloudError::ApiError { status, message },
            VultrError::Http(e) => CloudError::Transport(e.to_string()),
            VultrError::JsonError(e) => CloudError::Json(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, VultrError>;
