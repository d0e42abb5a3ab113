//! prenv core
//!
//! Converges one pull request's preview environment (a VM plus its DNS
//! records) to present or absent:
//!
//! - [`fetch`]: cursor-driven listing of VMs and DNS records
//! - [`mutate`]: create/delete calls with response integrity checks
//! - [`poll`]: bounded waits for IP assignment and readiness
//! - [`reconcile`]: which existing resources belong to the environment
//! - [`workflow`]: the create/destroy state machine and exit classification
//!
//! The orchestrator only talks to a [`prenv_cloud::CloudApi`] and a
//! [`WorkflowConfig`] built by the caller.

pub mod config;
pub mod environment;
pub mod error;
pub mod fetch;
pub mod mutate;
pub mod os;
pub mod outputs;
pub mod poll;
pub mod reconcile;
pub mod workflow;

pub use config::{Action, DEFAULT_SETTLE_DELAY, WildcardRecordType, WorkflowConfig, split_list};
pub use environment::Environment;
pub use error::{ConfigError, ProvisionError, Result};
pub use os::os_id;
pub use outputs::{Outputs, PasswordPolicy};
pub use poll::PollConfig;
pub use reconcile::RecordMatchPolicy;
pub use workflow::{
    CreateReport, DestroyReport, ExitClass, Existing, Orchestrator, Outcome, Presence,
};
