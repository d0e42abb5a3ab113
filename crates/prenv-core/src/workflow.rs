//! Create / destroy orchestration
//!
//! ```text
//! Start → CheckExisting → {Absent, Present, PartiallyPresent}
//!       → (Creating | Destroying | NoOp) → (Succeeded | Failed)
//! ```
//!
//! A failed create leaves whatever was already created in place for manual
//! inspection; there is no rollback. Destroy is best-effort: each deletion
//! is attempted and its failure logged without stopping the others.

use crate::config::{Action, WorkflowConfig};
use crate::error::{ProvisionError, Result};
use crate::mutate::{create_dns_record, create_vm, delete_dns_record, delete_vm};
use crate::poll::{check_deadline, wait_for_ip, wait_until_ready};
use crate::reconcile::{find_existing_records, find_existing_vms};
use futures_util::future::join_all;
use prenv_cloud::{BatchResult, CloudApi, DnsRecord, VirtualMachine};
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// What already exists for the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Existing {
    pub record_ids: Vec<String>,
    pub vm_ids: Vec<String>,
}

/// Coarse state of an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Absent,
    Present,
    /// Only records or only VMs; never repaired automatically
    PartiallyPresent,
}

impl Existing {
    pub fn presence(&self) -> Presence {
        match (self.record_ids.is_empty(), self.vm_ids.is_empty()) {
            (true, true) => Presence::Absent,
            (false, false) => Presence::Present,
            _ => Presence::PartiallyPresent,
        }
    }
}

impl std::fmt::Display for Presence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Presence::Absent => write!(f, "absent"),
            Presence::Present => write!(f, "present"),
            Presence::PartiallyPresent => write!(f, "partially present"),
        }
    }
}

/// Everything a successful create produced
#[derive(Debug, Clone)]
pub struct CreateReport {
    /// VM as returned by the creation call (carries the root password)
    pub vm: VirtualMachine,
    pub ip_address: String,
    pub dns_records: Vec<DnsRecord>,
    pub elapsed: Duration,
}

/// Per-item outcome of a teardown
#[derive(Debug, Clone, Default)]
pub struct DestroyReport {
    pub records: BatchResult,
    pub vms: BatchResult,
}

impl DestroyReport {
    /// Every deletion went through
    pub fn is_clean(&self) -> bool {
        self.records.is_success() && self.vms.is_success()
    }
}

/// How a successful run ended
#[derive(Debug, Clone)]
pub enum Outcome {
    Created(CreateReport),
    Destroyed(DestroyReport),
    /// Nothing to do for `action` given what exists
    NoOp { action: Action, presence: Presence },
}

/// Drives one environment through a create or destroy run
pub struct Orchestrator<'a, C: ?Sized> {
    api: &'a C,
    config: &'a WorkflowConfig,
}

impl<'a, C> Orchestrator<'a, C>
where
    C: CloudApi + ?Sized,
{
    pub fn new(api: &'a C, config: &'a WorkflowConfig) -> Self {
        Self { api, config }
    }

    /// Run `action` to completion
    pub async fn run(&self, action: Action) -> Result<Outcome> {
        self.config.validate()?;
        let deadline = self.config.deadline.map(|d| Instant::now() + d);
        tracing::info!(provider = self.api.name(), %action, "run started");

        let existing = self.check_existing().await?;
        let presence = existing.presence();
        tracing::debug!(%action, %presence, "existence check complete");

        match (action, presence) {
            (Action::Create, Presence::Absent) => {
                tracing::info!(environment = %self.config.environment, "creating resources");
                self.create(deadline).await.map(Outcome::Created)
            }
            (Action::Create, _) => {
                tracing::warn!(%presence, "resources already exist - not attempting to create");
                Ok(Outcome::NoOp { action, presence })
            }
            (Action::Destroy, Presence::Present) => {
                tracing::info!(environment = %self.config.environment, "performing teardown");
                Ok(Outcome::Destroyed(self.destroy(existing).await))
            }
            (Action::Destroy, _) => {
                tracing::warn!(%presence, "resources don't exist - not attempting to destroy");
                Ok(Outcome::NoOp { action, presence })
            }
        }
    }

    /// Look up records and VMs concurrently
    pub async fn check_existing(&self) -> Result<Existing> {
        let environment = &self.config.environment;
        let (record_ids, vm_ids) = tokio::try_join!(
            find_existing_records(self.api, environment, &self.config.record_match),
            find_existing_vms(self.api, &self.config.region, environment),
        )?;
        Ok(Existing { record_ids, vm_ids })
    }

    async fn create(&self, deadline: Option<Instant>) -> Result<CreateReport> {
        let started = Instant::now();
        let config = self.config;
        let domain = config.environment.domain();

        check_deadline(deadline, "creating VM")?;
        let vm = create_vm(self.api, &config.vm_request()).await?;
        tracing::info!(vm_id = %vm.id, label = %vm.label, "instance created");

        let ip_address = wait_for_ip(self.api, &vm.id, &config.ip_poll, deadline).await?;
        tracing::info!(vm_id = %vm.id, ip = %ip_address, "instance has been assigned IP");

        check_deadline(deadline, "creating DNS records")?;
        let host_request = config.host_record_request(&ip_address);
        let wildcard_request = config.wildcard_record_request(&ip_address);
        let (host, wildcard) = tokio::join!(
            create_dns_record(self.api, domain, &host_request),
            create_dns_record(self.api, domain, &wildcard_request),
        );
        let dns_records = require_all(vec![host, wildcard])?;
        for record in &dns_records {
            tracing::info!(
                record_id = %record.id,
                record_type = %record.record_type,
                name = %record.name,
                data = %record.data,
                "DNS record created"
            );
        }

        wait_until_ready(self.api, &vm.id, &config.ready_poll, deadline).await?;

        check_deadline(deadline, "waiting for the instance to accept connections")?;
        tracing::info!(
            settle_secs = config.settle_delay.as_secs(),
            "instance active - waiting to ensure it's accessible"
        );
        sleep(config.settle_delay).await;

        let elapsed = started.elapsed();
        tracing::info!(
            elapsed_secs = elapsed.as_secs_f64(),
            "all resources created and made ready"
        );

        Ok(CreateReport {
            vm,
            ip_address,
            dns_records,
            elapsed,
        })
    }

    async fn destroy(&self, existing: Existing) -> DestroyReport {
        let api = self.api;
        let domain = self.config.environment.domain();

        let started = Instant::now();
        let outcomes = join_all(existing.record_ids.iter().map(|id| async move {
            (id.as_str(), delete_dns_record(api, domain, id).await)
        }))
        .await;
        let records = collect_outcomes("DNS record", outcomes, started);
        tracing::info!(%records, "DNS records destroyed");

        let started = Instant::now();
        let outcomes = join_all(
            existing
                .vm_ids
                .iter()
                .map(|id| async move { (id.as_str(), delete_vm(api, id).await) }),
        )
        .await;
        let vms = collect_outcomes("instance", outcomes, started);
        tracing::info!(%vms, "instance destroyed");

        DestroyReport { records, vms }
    }
}

/// All siblings must succeed; every failure is logged, the first returned
fn require_all<T>(results: Vec<Result<T>>) -> Result<Vec<T>> {
    let mut values = Vec::with_capacity(results.len());
    let mut first_error = None;

    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(e) => {
                tracing::error!(error = %e, "concurrent step failed");
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(values),
    }
}

/// Record per-item deletion outcomes without failing the batch
fn collect_outcomes(
    kind: &str,
    outcomes: Vec<(&str, Result<()>)>,
    started: Instant,
) -> BatchResult {
    let mut batch = BatchResult::new();
    for (id, outcome) in outcomes {
        let target = format!("{} {}", kind, id);
        match outcome {
            Ok(()) => batch.add_success(target),
            Err(e) => {
                tracing::error!(target = %target, error = %e, "deletion failed");
                batch.add_failure(target, e.to_string());
            }
        }
    }
    batch.duration_ms = started.elapsed().as_millis() as u64;
    batch
}

/// Process exit classification of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitClass {
    Success,
    NoOp,
    Failed,
    Usage,
}

impl ExitClass {
    pub fn of(result: &std::result::Result<Outcome, ProvisionError>) -> Self {
        match result {
            Ok(Outcome::NoOp { .. }) => ExitClass::NoOp,
            Ok(_) => ExitClass::Success,
            Err(e) if e.is_usage() => ExitClass::Usage,
            Err(_) => ExitClass::Failed,
        }
    }

    /// 0 for success and no-op, 1 for a failed run, 2 for bad input
    pub fn code(self) -> i32 {
        match self {
            ExitClass::Success | ExitClass::NoOp => 0,
            ExitClass::Failed => 1,
            ExitClass::Usage => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_presence() {
        let mut existing = Existing::default();
        assert_eq!(existing.presence(), Presence::Absent);

        existing.record_ids.push("r1".to_string());
        assert_eq!(existing.presence(), Presence::PartiallyPresent);

        existing.vm_ids.push("v1".to_string());
        assert_eq!(existing.presence(), Presence::Present);

        existing.record_ids.clear();
        assert_eq!(existing.presence(), Presence::PartiallyPresent);
    }

    #[test]
    fn test_require_all_returns_first_error() {
        let ok: Vec<Result<u32>> = vec![Ok(1), Ok(2)];
        assert_eq!(require_all(ok).unwrap(), vec![1, 2]);

        let mixed: Vec<Result<u32>> = vec![
            Ok(1),
            Err(ProvisionError::MissingEntity {
                kind: "DNS record",
                target: "CNAME *.42".to_string(),
            }),
            Err(ProvisionError::DeadlineExceeded {
                stage: "x".to_string(),
            }),
        ];
        assert!(matches!(
            require_all(mixed),
            Err(ProvisionError::MissingEntity { .. })
        ));
    }

    #[test]
    fn test_exit_classification() {
        let noop: Result<Outcome> = Ok(Outcome::NoOp {
            action: Action::Destroy,
            presence: Presence::Absent,
        });
        assert_eq!(ExitClass::of(&noop), ExitClass::NoOp);
        assert_eq!(ExitClass::of(&noop).code(), 0);

        let destroyed: Result<Outcome> = Ok(Outcome::Destroyed(DestroyReport::default()));
        assert_eq!(ExitClass::of(&destroyed).code(), 0);

        let failed: Result<Outcome> = Err(ProvisionError::PollTimeout {
            vm_id: "v1".to_string(),
            attempts: 3,
            waiting_for: "become ready",
        });
        assert_eq!(ExitClass::of(&failed), ExitClass::Failed);
        assert_eq!(ExitClass::of(&failed).code(), 1);

        let usage: Result<Outcome> = Err(ConfigError::Missing("region").into());
        assert_eq!(ExitClass::of(&usage), ExitClass::Usage);
        assert_eq!(ExitClass::of(&usage).code(), 2);
    }
}
