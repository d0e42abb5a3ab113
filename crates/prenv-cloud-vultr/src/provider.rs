//! CloudApi implementation backed by the Vultr client

use crate::client::VultrClient;
use async_trait::async_trait;
use prenv_cloud::{
    CloudApi, CreateDnsRecordRequest, CreateVmRequest, DnsRecord, DnsRecordEnvelope, Page,
    PageRequest, VirtualMachine, VmEnvelope,
};

#[async_trait]
impl CloudApi for VultrClient {
    fn name(&self) -> &str {
        "vultr"
    }

    async fn list_vms(
        &self,
        region: Option<&str>,
        page: &PageRequest,
    ) -> prenv_cloud::Result<Page<VirtualMachine>> {
        tracing::trace!(?region, cursor = ?page.cursor, "GET instances");
        Ok(self.list_instances(region, page).await?)
    }

    async fn list_dns_records(
        &self,
        domain: &str,
        page: &PageRequest,
    ) -> prenv_cloud::Result<Page<DnsRecord>> {
        tracing::trace!(domain, cursor = ?page.cursor, "GET domain records");
        Ok(self.list_records(domain, page).await?)
    }

    async fn get_vm(&self, id: &str) -> prenv_cloud::Result<VmEnvelope> {
        Ok(self.get_instance(id).await?)
    }

    async fn create_vm(&self, request: &CreateVmRequest) -> prenv_cloud::Result<VmEnvelope> {
        tracing::debug!(label = %request.label, region = %request.region, "POST instances");
        Ok(self.create_instance(request).await?)
    }

    async fn create_dns_record(
        &self,
        domain: &str,
        request: &CreateDnsRecordRequest,
    ) -> prenv_cloud::Result<DnsRecordEnvelope> {
        tracing::debug!(
            domain,
            name = %request.name,
            record_type = %request.record_type,
            "POST domain records"
        );
        Ok(self.create_record(domain, request).await?)
    }

    async fn delete_vm(&self, id: &str) -> prenv_cloud::Result<()> {
        tracing::debug!(id, "DELETE instance");
        Ok(self.delete_instance(id).await?)
    }

    async fn delete_dns_record(&self, domain: &str, record_id: &str) -> prenv_cloud::Result<()> {
        tracing::debug!(domain, record_id, "DELETE domain record");
        Ok(self.delete_record(domain, record_id).await?)
    }
}
