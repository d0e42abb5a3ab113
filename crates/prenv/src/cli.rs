use clap::{ArgAction, Parser};
use prenv_cloud_vultr::{VULTR_API_BASE, VultrConfig};
use prenv_core::{
    Action, ConfigError, Environment, PasswordPolicy, PollConfig, RecordMatchPolicy,
    WildcardRecordType, WorkflowConfig, os_id, split_list,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "prenv")]
#[command(version, about = "Ephemeral per-pull-request preview environments on Vultr", long_about = None)]
pub struct Cli {
    /// Workflow to run (create, destroy)
    #[arg(short, long, env = "PRENV_ACTION")]
    pub action: String,

    /// Pull request number, used as the DNS label of the environment
    #[arg(short, long, env = "PRENV_PULL_REQUEST_ID")]
    pub pull_request_id: String,

    /// Base domain managed in Vultr DNS
    #[arg(short, long, env = "PRENV_DOMAIN")]
    pub domain: String,

    /// Vultr region (e.g. ewr)
    #[arg(short, long, env = "PRENV_REGION")]
    pub region: String,

    /// Vultr plan (e.g. vc2-1c-1gb)
    #[arg(long, env = "PRENV_PLAN")]
    pub plan: String,

    /// OS selector (ubuntu, ubuntu-22.04, debian, rocky, alma, ...)
    #[arg(long, env = "PRENV_OS", default_value = "ubuntu")]
    pub os: String,

    /// Tag attached to the VM; repeat or comma separate
    #[arg(long = "tag", env = "PRENV_TAGS", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// SSH key IDs installed on the VM, comma separated
    #[arg(long, env = "PRENV_SSH_KEY_IDS", default_value = "")]
    pub ssh_key_ids: String,

    /// Cloud-init user data file
    #[arg(long, env = "PRENV_USER_DATA")]
    pub user_data: Option<PathBuf>,

    /// Record type of the `*.{id}` record (cname, a)
    #[arg(long, env = "PRENV_WILDCARD_RECORD_TYPE", default_value = "cname")]
    pub wildcard_record_type: String,

    /// Treat `_acme-challenge.{id}` TXT records as part of the environment
    #[arg(
        long,
        env = "PRENV_MATCH_ACME_CHALLENGE",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub match_acme_challenge: bool,

    /// Publish the VM's root password as an output
    #[arg(long, env = "PRENV_EXPOSE_PASSWORD")]
    pub expose_password: bool,

    #[arg(long, default_value_t = 5)]
    pub ip_poll_interval_secs: u64,

    #[arg(long, default_value_t = 30)]
    pub ip_poll_attempts: u32,

    #[arg(long, default_value_t = 15)]
    pub ready_poll_interval_secs: u64,

    #[arg(long, default_value_t = 60)]
    pub ready_poll_attempts: u32,

    /// Pause after the VM reports ready
    #[arg(long, default_value_t = 30)]
    pub settle_secs: u64,

    /// Give up once this many seconds have passed
    #[arg(long, env = "PRENV_DEADLINE_SECS")]
    pub deadline_secs: Option<u64>,

    #[arg(long, env = "VULTR_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "VULTR_API_URL", default_value = VULTR_API_BASE)]
    pub api_url: String,
}

impl Cli {
    pub fn action(&self) -> Result<Action, ConfigError> {
        self.action.parse()
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        if self.expose_password {
            PasswordPolicy::Expose
        } else {
            PasswordPolicy::Redact
        }
    }

    /// Validated run configuration; reads the user data file if one is given
    pub fn workflow_config(&self) -> Result<WorkflowConfig, ConfigError> {
        let environment = Environment::new(&self.pull_request_id, &self.domain)?;
        let os_id = os_id(&self.os)?;
        let mut config = WorkflowConfig::new(environment, &self.region, &self.plan, os_id);

        config.tags = self
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        config.ssh_key_ids = split_list(&self.ssh_key_ids);
        config.user_data = self.user_data.as_deref().map(read_user_data).transpose()?;
        config.wildcard_record_type = self.wildcard_record_type.parse::<WildcardRecordType>()?;
        config.record_match = RecordMatchPolicy {
            match_acme_challenge: self.match_acme_challenge,
        };
        config.ip_poll = PollConfig::new(
            Duration::from_secs(self.ip_poll_interval_secs),
            self.ip_poll_attempts,
        );
        config.ready_poll = PollConfig::new(
            Duration::from_secs(self.ready_poll_interval_secs),
            self.ready_poll_attempts,
        );
        config.settle_delay = Duration::from_secs(self.settle_secs);
        config.deadline = self.deadline_secs.map(Duration::from_secs);

        config.validate()?;
        Ok(config)
    }

    pub fn vultr_config(&self) -> Result<VultrConfig, ConfigError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("VULTR_API_KEY"))?;

        Ok(VultrConfig::new(api_key).with_base_url(&self.api_url))
    }
}

fn read_user_data(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
        what: "user data",
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
