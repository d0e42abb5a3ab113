//! Orchestrator error types

use prenv_cloud::CloudError;
use thiserror::Error;

/// Invalid input, detected before any API call is made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid action '{0}' (must be 'create' or 'destroy')")]
    InvalidAction(String),

    #[error("invalid os '{given}' (must be one of: {valid})")]
    InvalidOs { given: String, valid: String },

    #[error("invalid pull request id '{0}': must be a single DNS label (letters, digits, '-')")]
    InvalidPullRequestId(String),

    #[error("invalid domain '{0}'")]
    InvalidDomain(String),

    #[error("invalid wildcard record type '{0}' (must be 'cname' or 'a')")]
    InvalidRecordType(String),

    #[error("{name} must be at least 1")]
    ZeroAttempts { name: &'static str },

    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("cannot read {what} from {path}: {reason}")]
    Unreadable {
        what: &'static str,
        path: String,
        reason: String,
    },
}

/// Failure of a create or destroy run
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{operation} failed: {source}")]
    Api {
        operation: String,
        #[source]
        source: CloudError,
    },

    /// The API call went through but the response carried no entity
    #[error("{kind} creation for '{target}' succeeded without returning the {kind}")]
    MissingEntity { kind: &'static str, target: String },

    #[error("VM {vm_id} did not {waiting_for} after {attempts} attempts")]
    PollTimeout {
        vm_id: String,
        attempts: u32,
        waiting_for: &'static str,
    },

    #[error("deadline exceeded while {stage}")]
    DeadlineExceeded { stage: String },
}

impl ProvisionError {
    /// Wrap a cloud error with the operation that produced it
    pub fn api(operation: impl Into<String>) -> impl FnOnce(CloudError) -> Self {
        let operation = operation.into();
        move |source| ProvisionError::Api { operation, source }
    }

    /// Usage errors get their own exit classification
    pub fn is_usage(&self) -> bool {
        matches!(self, ProvisionError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
