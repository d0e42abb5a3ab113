//! Single-shot create and delete operations

use crate::error::{ProvisionError, Result};
use prenv_cloud::{CloudApi, CreateDnsRecordRequest, CreateVmRequest, DnsRecord, VirtualMachine};

/// Create a VM and insist the response actually contains it
pub async fn create_vm<C>(api: &C, request: &CreateVmRequest) -> Result<VirtualMachine>
where
    C: CloudApi + ?Sized,
{
    let envelope = api
        .create_vm(request)
        .await
        .map_err(ProvisionError::api(format!("create VM {}", request.label)))?;

    match envelope.vm {
        Some(vm) if !vm.id.is_empty() => Ok(vm),
        _ => Err(ProvisionError::MissingEntity {
            kind: "VM",
            target: request.label.clone(),
        }),
    }
}

/// Create a DNS record and insist the response actually contains it
pub async fn create_dns_record<C>(
    api: &C,
    domain: &str,
    request: &CreateDnsRecordRequest,
) -> Result<DnsRecord>
where
    C: CloudApi + ?Sized,
{
    let target = format!("{} {}", request.record_type, request.name);
    let envelope = api
        .create_dns_record(domain, request)
        .await
        .map_err(ProvisionError::api(format!("create DNS record {}", target)))?;

    match envelope.record {
        Some(record) if !record.id.is_empty() => Ok(record),
        _ => Err(ProvisionError::MissingEntity {
            kind: "DNS record",
            target,
        }),
    }
}

pub async fn delete_vm<C>(api: &C, id: &str) -> Result<()>
where
    C: CloudApi + ?Sized,
{
    api.delete_vm(id)
        .await
        .map_err(ProvisionError::api(format!("delete VM {}", id)))
}

pub async fn delete_dns_record<C>(api: &C, domain: &str, record_id: &str) -> Result<()>
where
    C: CloudApi + ?Sized,
{
    api.delete_dns_record(domain, record_id)
        .await
        .map_err(ProvisionError::api(format!("delete DNS record {}", record_id)))
}
