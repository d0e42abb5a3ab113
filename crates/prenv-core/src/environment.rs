//! Naming for one pull request's environment

use crate::error::ConfigError;

/// The set of resources belonging to one pull request under a base domain.
///
/// All existence checks and teardown are scoped to this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pull_request_id: String,
    domain: String,
}

impl Environment {
    pub fn new(
        pull_request_id: impl Into<String>,
        domain: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let pull_request_id = pull_request_id.into().trim().to_string();
        if !is_dns_label(&pull_request_id) {
            return Err(ConfigError::InvalidPullRequestId(pull_request_id));
        }

        let raw_domain = domain.into();
        let domain = raw_domain.trim().trim_end_matches('.').to_ascii_lowercase();
        if domain.is_empty() || domain.starts_with('.') || domain.split('.').any(str::is_empty) {
            return Err(ConfigError::InvalidDomain(raw_domain));
        }

        Ok(Self {
            pull_request_id,
            domain,
        })
    }

    pub fn pull_request_id(&self) -> &str {
        &self.pull_request_id
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// `{id}.{domain}`; also the VM label and hostname
    pub fn hostname(&self) -> String {
        format!("{}.{}", self.pull_request_id, self.domain)
    }

    /// `*.{id}.{domain}`
    pub fn wildcard_hostname(&self) -> String {
        format!("*.{}", self.hostname())
    }

    /// Name of the A record, relative to the domain
    pub fn record_name(&self) -> &str {
        &self.pull_request_id
    }

    /// Name of the wildcard record, relative to the domain
    pub fn wildcard_record_name(&self) -> String {
        format!("*.{}", self.pull_request_id)
    }

    /// TXT record left behind by ACME DNS-01 challenges
    pub fn acme_challenge_name(&self) -> String {
        format!("_acme-challenge.{}", self.pull_request_id)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hostname())
    }
}

fn is_dns_label(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 63
        && !s.starts_with('-')
        && !s.ends_with('-')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
