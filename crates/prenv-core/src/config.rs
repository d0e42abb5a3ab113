//! Immutable run configuration
//!
//! Built once at the process boundary and passed into the orchestrator;
//! nothing below this reads the environment.

use crate::environment::Environment;
use crate::error::ConfigError;
use crate::poll::PollConfig;
use crate::reconcile::RecordMatchPolicy;
use prenv_cloud::{CreateDnsRecordRequest, CreateVmRequest, RecordType};
use std::str::FromStr;
use std::time::Duration;

/// Default pause after readiness, covering sshd start-up lag that the
/// status API does not reflect
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(30);

/// Requested workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Destroy,
}

impl FromStr for Action {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "destroy" => Ok(Action::Destroy),
            _ => Err(ConfigError::InvalidAction(s.to_string())),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Destroy => write!(f, "destroy"),
        }
    }
}

/// How the `*.{id}` record is published
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WildcardRecordType {
    /// CNAME to `{id}.{domain}`
    #[default]
    Cname,
    /// A record pointing straight at the VM's IP
    A,
}

impl FromStr for WildcardRecordType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cname" => Ok(WildcardRecordType::Cname),
            "a" => Ok(WildcardRecordType::A),
            _ => Err(ConfigError::InvalidRecordType(s.to_string())),
        }
    }
}

/// Everything a create or destroy run needs
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub environment: Environment,
    pub region: String,
    pub plan: String,
    pub os_id: u32,
    pub tags: Vec<String>,
    pub ssh_key_ids: Vec<String>,

    /// Cloud-init payload passed through to the VM
    pub user_data: Option<String>,

    pub wildcard_record_type: WildcardRecordType,
    pub record_match: RecordMatchPolicy,

    pub ip_poll: PollConfig,
    pub ready_poll: PollConfig,
    pub settle_delay: Duration,

    /// Overall budget measured from the start of the run; checked between
    /// steps and poll attempts only
    pub deadline: Option<Duration>,
}

impl WorkflowConfig {
    pub fn new(
        environment: Environment,
        region: impl Into<String>,
        plan: impl Into<String>,
        os_id: u32,
    ) -> Self {
        Self {
            environment,
            region: region.into(),
            plan: plan.into(),
            os_id,
            tags: Vec::new(),
            ssh_key_ids: Vec::new(),
            user_data: None,
            wildcard_record_type: WildcardRecordType::default(),
            record_match: RecordMatchPolicy::default(),
            ip_poll: PollConfig::ip_assignment(),
            ready_poll: PollConfig::readiness(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            deadline: None,
        }
    }

    /// Reject settings that would make the run meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::Missing("region"));
        }
        if self.plan.trim().is_empty() {
            return Err(ConfigError::Missing("plan"));
        }
        if self.ip_poll.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts {
                name: "IP poll attempts",
            });
        }
        if self.ready_poll.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts {
                name: "readiness poll attempts",
            });
        }
        Ok(())
    }

    /// VM creation request for this environment
    pub fn vm_request(&self) -> CreateVmRequest {
        let hostname = self.environment.hostname();
        CreateVmRequest {
            region: self.region.clone(),
            plan: self.plan.clone(),
            os_id: self.os_id,
            label: hostname.clone(),
            hostname,
            tags: self.tags.clone(),
            ssh_key_ids: self.ssh_key_ids.clone(),
            user_data: self.user_data.clone(),
        }
    }

    /// A record `{id}` → `ip`
    pub fn host_record_request(&self, ip: &str) -> CreateDnsRecordRequest {
        CreateDnsRecordRequest {
            name: self.environment.record_name().to_string(),
            record_type: RecordType::A,
            data: ip.to_string(),
        }
    }

    /// Wildcard record `*.{id}`, per the configured record type
    pub fn wildcard_record_request(&self, ip: &str) -> CreateDnsRecordRequest {
        let (record_type, data) = match self.wildcard_record_type {
            WildcardRecordType::Cname => (RecordType::Cname, self.environment.hostname()),
            WildcardRecordType::A => (RecordType::A, ip.to_string()),
        };
        CreateDnsRecordRequest {
            name: self.environment.wildcard_record_name(),
            record_type,
            data,
        }
    }
}

/// Split a comma separated list, ignoring surrounding spaces and empty items
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
