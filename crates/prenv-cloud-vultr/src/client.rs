//! Vultr v2 API client
//!
//! Direct REST implementation with Bearer token authentication.

use crate::error::{Result, VultrError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use prenv_cloud::{
    CreateDnsRecordRequest, CreateVmRequest, DnsRecord, DnsRecordEnvelope, Page, PageRequest,
    VirtualMachine, VmEnvelope,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const VULTR_API_BASE: &str = "https://api.vultr.com/v2";

/// Configuration for the Vultr client
#[derive(Debug, Clone)]
pub struct VultrConfig {
    pub api_key: String,
    pub base_url: String,
}

impl VultrConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: VULTR_API_BASE.to_string(),
        }
    }

    /// Point the client at another endpoint (proxies, staging)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Vultr API client
pub struct VultrClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl VultrClient {
    /// Create a new client
    pub fn new(config: VultrConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(VultrError::MissingApiKey);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key: config.api_key,
            base_url: config.base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send a request and turn non-2xx answers into errors
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.bearer_auth(&self.api_key).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(VultrError::from_status(
            status.as_u16(),
            error_message(&body),
        ))
    }

    /// Decode a JSON body; an empty body decodes to `T::default()`
    async fn json<T: DeserializeOwned + Default>(response: reqwest::Response) -> Result<T> {
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// List one page of instances
    pub async fn list_instances(
        &self,
        region: Option<&str>,
        page: &PageRequest,
    ) -> Result<Page<VirtualMachine>> {
        let mut query = page_query(page);
        if let Some(region) = region {
            query.push(("region", region.to_string()));
        }

        let request = self.client.get(self.url("instances")).query(&query);
        let body: InstanceList = Self::json(self.send(request).await?).await?;

        Ok(Page {
            items: body.instances,
            next_cursor: body.meta.next_cursor(),
        })
    }

    /// List one page of DNS records of a domain
    pub async fn list_records(&self, domain: &str, page: &PageRequest) -> Result<Page<DnsRecord>> {
        let request = self
            .client
            .get(self.url(&format!("domains/{}/records", domain)))
            .query(&page_query(page));
        let body: RecordList = Self::json(self.send(request).await?).await?;

        Ok(Page {
            items: body.records,
            next_cursor: body.meta.next_cursor(),
        })
    }

    /// Get a single instance
    pub async fn get_instance(&self, id: &str) -> Result<VmEnvelope> {
        let request = self.client.get(self.url(&format!("instances/{}", id)));
        Self::json(self.send(request).await?).await
    }

    /// Create an instance
    pub async fn create_instance(&self, request: &CreateVmRequest) -> Result<VmEnvelope> {
        let body = CreateInstanceBody {
            user_data: request.user_data.as_deref().map(|data| STANDARD.encode(data)),
            request,
        };

        let request = self.client.post(self.url("instances")).json(&body);
        Self::json(self.send(request).await?).await
    }

    /// Create a DNS record
    pub async fn create_record(
        &self,
        domain: &str,
        request: &CreateDnsRecordRequest,
    ) -> Result<DnsRecordEnvelope> {
        let request = self
            .client
            .post(self.url(&format!("domains/{}/records", domain)))
            .json(request);
        Self::json(self.send(request).await?).await
    }

    /// Delete an instance
    pub async fn delete_instance(&self, id: &str) -> Result<()> {
        let request = self.client.delete(self.url(&format!("instances/{}", id)));
        self.send(request).await?;
        Ok(())
    }

    /// Delete a DNS record
    pub async fn delete_record(&self, domain: &str, record_id: &str) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("domains/{}/records/{}", domain, record_id)));
        self.send(request).await?;
        Ok(())
    }
}

fn page_query(page: &PageRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![("per_page", page.per_page.to_string())];
    if let Some(cursor) = &page.cursor {
        query.push(("cursor", cursor.clone()));
    }
    query
}

/// Pull the human-readable message out of an error body
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|e| e.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}

// ============ API Types ============

#[derive(Debug, Serialize)]
struct CreateInstanceBody<'a> {
    #[serde(flatten)]
    request: &'a CreateVmRequest,

    #[serde(skip_serializing_if = "Option::is_none")]
    user_data: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct InstanceList {
    #[serde(default)]
    instances: Vec<VirtualMachine>,
    #[serde(default)]
    meta: ListMeta,
}

#[derive(Debug, Default, Deserialize)]
struct RecordList {
    #[serde(default)]
    records: Vec<DnsRecord>,
    #[serde(default)]
    meta: ListMeta,
}

#[derive(Debug, Default, Deserialize)]
struct ListMeta {
    #[serde(default)]
    links: Option<ListLinks>,
}

#[derive(Debug, Default, Deserialize)]
struct ListLinks {
    #[serde(default)]
    next: Option<String>,
}

impl ListMeta {
    /// Vultr marks the last page with an empty `next` link
    fn next_cursor(&self) -> Option<String> {
        self.links
            .as_ref()
            .and_then(|l| l.next.clone())
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
}
