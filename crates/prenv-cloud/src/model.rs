//! Resource model shared by the orchestrator and provider bindings

use serde::{Deserialize, Serialize};

/// Value the provider reports in `main_ip` before an address is assigned.
pub const UNASSIGNED_IP: &str = "0.0.0.0";

const POWER_RUNNING: &str = "running";
const SERVER_OK: &str = "ok";
const STATUS_ACTIVE: &str = "active";

/// A virtual machine as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualMachine {
    pub id: String,

    #[serde(default)]
    pub hostname: String,

    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub region: String,

    #[serde(default)]
    pub plan: String,

    #[serde(default)]
    pub os_id: u32,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Power state ("running" once booted)
    #[serde(default)]
    pub power_status: String,

    /// Hypervisor view of the server ("ok" once healthy)
    #[serde(default)]
    pub server_status: String,

    /// Lifecycle state ("active" once provisioned)
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub main_ip: String,

    /// Root password; only populated in the creation response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_password: Option<String>,
}

impl VirtualMachine {
    /// The public IPv4 address, if one has been assigned yet.
    pub fn assigned_ip(&self) -> Option<&str> {
        let ip = self.main_ip.trim();
        if ip.is_empty() || ip == UNASSIGNED_IP {
            None
        } else {
            Some(ip)
        }
    }

    /// Power, server and lifecycle status all report operational.
    pub fn is_ready(&self) -> bool {
        self.power_status == POWER_RUNNING
            && self.server_status == SERVER_OK
            && self.status == STATUS_ACTIVE
    }

    /// Copy of this VM with the root password removed.
    pub fn redacted(&self) -> Self {
        Self {
            default_password: None,
            ..self.clone()
        }
    }
}

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Cname,
    Txt,
    /// Anything else (MX, AAAA, NS, ...); never matched or created
    #[serde(other)]
    Other,
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
            RecordType::Cname => write!(f, "CNAME"),
            RecordType::Txt => write!(f, "TXT"),
            RecordType::Other => write!(f, "OTHER"),
        }
    }
}

/// A DNS record inside a managed domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: String,

    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Name relative to the domain (`42`, `*.42`)
    pub name: String,

    /// Target value: an IP for A records, a hostname for CNAME records
    #[serde(default)]
    pub data: String,

    #[serde(default)]
    pub ttl: Option<u32>,

    #[serde(default)]
    pub priority: Option<i32>,
}

/// Parameters for creating a virtual machine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateVmRequest {
    pub region: String,
    pub plan: String,
    pub os_id: u32,
    pub hostname: String,
    pub label: String,
    pub tags: Vec<String>,

    #[serde(rename = "sshkey_id", skip_serializing_if = "Vec::is_empty")]
    pub ssh_key_ids: Vec<String>,

    /// Cloud-init payload, plain text; the binding handles encoding
    #[serde(skip)]
    pub user_data: Option<String>,
}

/// Parameters for creating a DNS record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateDnsRecordRequest {
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: RecordType,

    pub data: String,
}

/// Response body of a single-VM call.
///
/// The provider has been seen answering a creation request with a success
/// status and no VM in the body, so the entity is optional here and checked
/// by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VmEnvelope {
    #[serde(default, alias = "instance")]
    pub vm: Option<VirtualMachine>,
}

/// Response body of a single-record call; see [`VmEnvelope`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DnsRecordEnvelope {
    #[serde(default)]
    pub record: Option<DnsRecord>,
}
