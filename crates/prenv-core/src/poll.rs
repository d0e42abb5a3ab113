//! Bounded fixed-interval polling of VM state
//!
//! Each attempt fetches, tests, then sleeps. The delay
//! between attempts is constant.

use crate::error::{ProvisionError, Result};
use prenv_cloud::{CloudApi, CloudError, VirtualMachine};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Polling budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause between two attempts
    pub interval: Duration,

    /// Total number of fetches, failed ones included
    pub max_attempts: u32,
}

impl PollConfig {
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// 5 s × 30 (≈ 2.5 min)
    pub const fn ip_assignment() -> Self {
        Self::new(Duration::from_secs(5), 30)
    }

    /// 15 s × 60 (≈ 15 min)
    pub const fn readiness() -> Self {
        Self::new(Duration::from_secs(15), 60)
    }
}

/// Fail once `deadline` has passed
pub fn check_deadline(deadline: Option<Instant>, stage: &str) -> Result<()> {
    match deadline {
        Some(deadline) if Instant::now() >= deadline => Err(ProvisionError::DeadlineExceeded {
            stage: stage.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Fetch until `predicate` holds, at most `config.max_attempts` times.
///
/// Fetch errors are logged and count as a spent attempt. The deadline is
/// only looked at before an attempt, never during one.
pub async fn poll_until<T, E, F, Fut, P>(
    vm_id: &str,
    waiting_for: &'static str,
    config: &PollConfig,
    deadline: Option<Instant>,
    mut fetch: F,
    mut predicate: P,
) -> Result<T>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    P: FnMut(&T) -> bool,
{
    for attempt in 1..=config.max_attempts {
        check_deadline(deadline, &format!("waiting for VM {} to {}", vm_id, waiting_for))?;

        match fetch().await {
            Ok(value) if predicate(&value) => {
                tracing::debug!(vm_id, attempt, "{} reached", waiting_for);
                return Ok(value);
            }
            Ok(_) => {
                tracing::debug!(
                    vm_id,
                    attempt,
                    max_attempts = config.max_attempts,
                    "still waiting to {}",
                    waiting_for
                );
            }
            Err(e) => {
                tracing::warn!(vm_id, attempt, error = %e, "poll attempt failed");
            }
        }

        if attempt < config.max_attempts {
            sleep(config.interval).await;
        }
    }

    Err(ProvisionError::PollTimeout {
        vm_id: vm_id.to_string(),
        attempts: config.max_attempts,
        waiting_for,
    })
}

/// Read a VM, treating a body without the VM as a failed read
async fn read_vm<C>(api: &C, vm_id: &str) -> prenv_cloud::Result<VirtualMachine>
where
    C: CloudApi + ?Sized,
{
    api.get_vm(vm_id)
        .await?
        .vm
        .ok_or_else(|| {
            CloudError::ResourceNotFound(format!("instance {} missing from response", vm_id))
        })
}

/// Wait until the VM has a public IP and return it
pub async fn wait_for_ip<C>(
    api: &C,
    vm_id: &str,
    config: &PollConfig,
    deadline: Option<Instant>,
) -> Result<String>
where
    C: CloudApi + ?Sized,
{
    let vm = poll_until(
        vm_id,
        "get an IP address",
        config,
        deadline,
        || read_vm(api, vm_id),
        |vm| vm.assigned_ip().is_some(),
    )
    .await?;

    Ok(vm.main_ip.trim().to_string())
}

/// Wait until power, server and lifecycle status all report ready
pub async fn wait_until_ready<C>(
    api: &C,
    vm_id: &str,
    config: &PollConfig,
    deadline: Option<Instant>,
) -> Result<VirtualMachine>
where
    C: CloudApi + ?Sized,
{
    poll_until(
        vm_id,
        "become ready",
        config,
        deadline,
        || read_vm(api, vm_id),
        VirtualMachine::is_ready,
    )
    .await
}
