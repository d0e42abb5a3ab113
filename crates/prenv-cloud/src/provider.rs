//! Cloud API capability trait

use crate::error::Result;
use crate::model::{
    CreateDnsRecordRequest, CreateVmRequest, DnsRecord, DnsRecordEnvelope, VirtualMachine,
    VmEnvelope,
};
use async_trait::async_trait;

/// Page size used for every collection request.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Cloud API abstraction trait
///
/// Exactly the operations the orchestrator needs from a provider. The
/// real implementation talks HTTP; tests drive the orchestrator through an
/// in-memory fake.
#[async_trait]
pub trait CloudApi: Send + Sync {
    /// Returns the provider name (e.g., "vultr")
    fn name(&self) -> &str;

    /// List one page of virtual machines, optionally scoped to a region
    async fn list_vms(
        &self,
        region: Option<&str>,
        page: &PageRequest,
    ) -> Result<Page<VirtualMachine>>;

    /// List one page of DNS records of `domain`
    async fn list_dns_records(&self, domain: &str, page: &PageRequest) -> Result<Page<DnsRecord>>;

    /// Fetch a single virtual machine
    async fn get_vm(&self, id: &str) -> Result<VmEnvelope>;

    /// Request a new virtual machine
    async fn create_vm(&self, request: &CreateVmRequest) -> Result<VmEnvelope>;

    /// Request a new DNS record in `domain`
    async fn create_dns_record(
        &self,
        domain: &str,
        request: &CreateDnsRecordRequest,
    ) -> Result<DnsRecordEnvelope>;

    /// Delete a virtual machine
    async fn delete_vm(&self, id: &str) -> Result<()>;

    /// Delete a DNS record of `domain`
    async fn delete_dns_record(&self, domain: &str, record_id: &str) -> Result<()>;
}

/// Parameters for a single page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub per_page: u32,

    /// Cursor returned by the previous page; `None` for the first page
    pub cursor: Option<String>,
}

impl PageRequest {
    pub fn first() -> Self {
        Self {
            per_page: DEFAULT_PAGE_SIZE,
            cursor: None,
        }
    }

    pub fn after(cursor: impl Into<String>) -> Self {
        Self {
            per_page: DEFAULT_PAGE_SIZE,
            cursor: Some(cursor.into()),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Present while more pages remain
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    pub fn with_next(items: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            items,
            next_cursor: Some(cursor.into()),
        }
    }
}
