//! Existence checks for an environment's resources
//!
//! Pure filters over fully fetched collections; the only API traffic is
//! the listing itself.

use crate::environment::Environment;
use crate::error::Result;
use crate::fetch::{fetch_all_dns_records, fetch_all_vms};
use prenv_cloud::{CloudApi, DnsRecord, RecordType, VirtualMachine};

/// Which records count as belonging to an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordMatchPolicy {
    /// Also claim `_acme-challenge.{id}` TXT records
    pub match_acme_challenge: bool,
}

impl Default for RecordMatchPolicy {
    fn default() -> Self {
        Self {
            match_acme_challenge: true,
        }
    }
}

/// Does `record` belong to `environment`?
///
/// The wildcard is accepted as either CNAME or A so environments created
/// under either record-type setting are still found.
pub fn record_belongs_to(
    record: &DnsRecord,
    environment: &Environment,
    policy: &RecordMatchPolicy,
) -> bool {
    match record.record_type {
        RecordType::A => {
            record.name == environment.record_name()
                || record.name == environment.wildcard_record_name()
        }
        RecordType::Cname => record.name == environment.wildcard_record_name(),
        RecordType::Txt => {
            policy.match_acme_challenge && record.name == environment.acme_challenge_name()
        }
        RecordType::Other => false,
    }
}

/// IDs of the records in `records` that belong to `environment`
pub fn matching_record_ids(
    records: &[DnsRecord],
    environment: &Environment,
    policy: &RecordMatchPolicy,
) -> Vec<String> {
    records
        .iter()
        .filter(|r| record_belongs_to(r, environment, policy))
        .map(|r| r.id.clone())
        .collect()
}

/// IDs of the VMs in `vms` labelled `{id}.{domain}`
pub fn matching_vm_ids(vms: &[VirtualMachine], environment: &Environment) -> Vec<String> {
    let label = environment.hostname();
    vms.iter()
        .filter(|vm| vm.label == label)
        .map(|vm| vm.id.clone())
        .collect()
}

/// DNS records of `environment` that already exist
pub async fn find_existing_records<C>(
    api: &C,
    environment: &Environment,
    policy: &RecordMatchPolicy,
) -> Result<Vec<String>>
where
    C: CloudApi + ?Sized,
{
    tracing::info!(
        pull_request = environment.pull_request_id(),
        domain = environment.domain(),
        "checking for existing DNS records"
    );

    let records = fetch_all_dns_records(api, environment.domain()).await?;
    let ids = matching_record_ids(&records, environment, policy);

    if ids.is_empty() {
        tracing::info!("no relevant DNS records exist");
    } else {
        tracing::info!(count = ids.len(), ids = ?ids, "DNS records already exist");
    }
    Ok(ids)
}

/// VMs of `environment` that already exist in `region`
pub async fn find_existing_vms<C>(
    api: &C,
    region: &str,
    environment: &Environment,
) -> Result<Vec<String>>
where
    C: CloudApi + ?Sized,
{
    tracing::info!(
        pull_request = environment.pull_request_id(),
        region,
        "checking for existing instance"
    );

    let vms = fetch_all_vms(api, Some(region)).await?;
    let ids = matching_vm_ids(&vms, environment);

    if ids.is_empty() {
        tracing::info!("relevant instance does not exist");
    } else {
        tracing::info!(count = ids.len(), ids = ?ids, "instance already exists");
    }
    Ok(ids)
}
