use async_trait::async_trait;
use prenv_cloud::{
    CloudApi, CloudError, CreateDnsRecordRequest, CreateVmRequest, DnsRecord, DnsRecordEnvelope,
    Page, PageRequest, RecordType, VirtualMachine, VmEnvelope,
};
use prenv_core::{Environment, PollConfig, WorkflowConfig};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

pub const ASSIGNED_IP: &str = "203.0.113.7";
pub const FAKE_PASSWORD: &str = "fake-root-password";

/// Number of calls per operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Calls {
    pub list_vms: u32,
    pub list_records: u32,
    pub get_vm: u32,
    pub create_vm: u32,
    pub create_record: u32,
    pub delete_vm: u32,
    pub delete_record: u32,
}

#[allow(dead_code)]
impl Calls {
    pub fn total(&self) -> u32 {
        self.list_vms
            + self.list_records
            + self.get_vm
            + self.create_vm
            + self.create_record
            + self.delete_vm
            + self.delete_record
    }
}

pub struct State {
    pub vms: Vec<VirtualMachine>,
    pub records: Vec<DnsRecord>,
    pub page_size: usize,

    /// `get_vm` call from which the VM reports an IP
    pub ip_after: u32,
    /// `get_vm` call from which the VM reports ready
    pub ready_after: u32,

    /// Creation calls succeed but return an empty body
    pub empty_vm_response: bool,
    pub empty_record_response: bool,
    /// Creation calls return the entity with an empty id
    pub blank_vm_id: bool,
    pub blank_record_id: bool,
    pub fail_record_create: bool,
    /// Record IDs whose deletion fails with not-found
    pub missing_on_delete: HashSet<String>,

    pub calls: Calls,
    pub vm_requests: Vec<CreateVmRequest>,
    next_id: u32,
}

/// Route orchestrator logs through the test harness; `RUST_LOG` picks the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// In-memory cloud with call accounting and scripted VM progression
pub struct FakeCloud {
    state: Mutex<State>,
}

#[allow(dead_code)]
impl FakeCloud {
    pub fn new() -> Self {
        init_tracing();
        Self {
            state: Mutex::new(State {
                vms: Vec::new(),
                records: Vec::new(),
                page_size: 100,
                ip_after: 1,
                ready_after: 1,
                empty_vm_response: false,
                empty_record_response: false,
                blank_vm_id: false,
                blank_record_id: false,
                fail_record_create: false,
                missing_on_delete: HashSet::new(),
                calls: Calls::default(),
                vm_requests: Vec::new(),
                next_id: 1,
            }),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Calls {
        self.state().calls.clone()
    }

    pub fn add_vm(&self, id: &str, label: &str, region: &str) {
        self.state().vms.push(VirtualMachine {
            id: id.to_string(),
            hostname: label.to_string(),
            label: label.to_string(),
            region: region.to_string(),
            main_ip: ASSIGNED_IP.to_string(),
            power_status: "running".to_string(),
            server_status: "ok".to_string(),
            status: "active".to_string(),
            ..Default::default()
        });
    }

    pub fn add_record(&self, id: &str, record_type: RecordType, name: &str) {
        self.state().records.push(DnsRecord {
            id: id.to_string(),
            record_type,
            name: name.to_string(),
            data: ASSIGNED_IP.to_string(),
            ttl: Some(300),
            priority: None,
        });
    }
}

fn paginate<T: Clone>(items: &[T], page_size: usize, page: &PageRequest) -> Page<T> {
    let offset: usize = page
        .cursor
        .as_deref()
        .and_then(|c| c.parse().ok())
        .unwrap_or(0);
    let end = (offset + page_size).min(items.len());
    let slice = items[offset.min(end)..end].to_vec();

    if end < items.len() {
        Page::with_next(slice, end.to_string())
    } else {
        Page::last(slice)
    }
}

#[async_trait]
impl CloudApi for FakeCloud {
    fn name(&self) -> &str {
        "fake"
    }

    async fn list_vms(
        &self,
        region: Option<&str>,
        page: &PageRequest,
    ) -> prenv_cloud::Result<Page<VirtualMachine>> {
        let mut state = self.state();
        state.calls.list_vms += 1;
        let vms: Vec<VirtualMachine> = state
            .vms
            .iter()
            .filter(|vm| region.is_none_or(|r| vm.region == r))
            .cloned()
            .collect();
        Ok(paginate(&vms, state.page_size, page))
    }

    async fn list_dns_records(
        &self,
        _domain: &str,
        page: &PageRequest,
    ) -> prenv_cloud::Result<Page<DnsRecord>> {
        let mut state = self.state();
        state.calls.list_records += 1;
        Ok(paginate(&state.records, state.page_size, page))
    }

    async fn get_vm(&self, id: &str) -> prenv_cloud::Result<VmEnvelope> {
        let mut state = self.state();
        state.calls.get_vm += 1;
        let call = state.calls.get_vm;
        let (ip_after, ready_after) = (state.ip_after, state.ready_after);

        let vm = state
            .vms
            .iter_mut()
            .find(|vm| vm.id == id)
            .ok_or_else(|| CloudError::ResourceNotFound(format!("instance {}", id)))?;

        if call >= ip_after {
            vm.main_ip = ASSIGNED_IP.to_string();
        }
        if call >= ready_after {
            vm.power_status = "running".to_string();
            vm.server_status = "ok".to_string();
            vm.status = "active".to_string();
        }

        Ok(VmEnvelope {
            vm: Some(vm.redacted()),
        })
    }

    async fn create_vm(&self, request: &CreateVmRequest) -> prenv_cloud::Result<VmEnvelope> {
        let mut state = self.state();
        state.calls.create_vm += 1;
        state.vm_requests.push(request.clone());

        let id = format!("vm-{}", state.next_id);
        state.next_id += 1;
        let vm = VirtualMachine {
            id,
            hostname: request.hostname.clone(),
            label: request.label.clone(),
            region: request.region.clone(),
            plan: request.plan.clone(),
            os_id: request.os_id,
            tags: request.tags.clone(),
            power_status: "stopped".to_string(),
            server_status: "none".to_string(),
            status: "pending".to_string(),
            main_ip: "0.0.0.0".to_string(),
            default_password: Some(FAKE_PASSWORD.to_string()),
        };
        state.vms.push(vm.clone());

        if state.empty_vm_response {
            return Ok(VmEnvelope { vm: None });
        }
        if state.blank_vm_id {
            return Ok(VmEnvelope {
                vm: Some(VirtualMachine {
                    id: String::new(),
                    ..vm
                }),
            });
        }
        Ok(VmEnvelope { vm: Some(vm) })
    }

    async fn create_dns_record(
        &self,
        _domain: &str,
        request: &CreateDnsRecordRequest,
    ) -> prenv_cloud::Result<DnsRecordEnvelope> {
        let mut state = self.state();
        state.calls.create_record += 1;

        if state.fail_record_create {
            return Err(CloudError::ApiError {
                status: 500,
                message: "internal error".to_string(),
            });
        }

        let record = DnsRecord {
            id: format!("rec-{}", state.next_id),
            record_type: request.record_type,
            name: request.name.clone(),
            data: request.data.clone(),
            ttl: Some(300),
            priority: None,
        };
        state.next_id += 1;
        state.records.push(record.clone());

        if state.empty_record_response {
            return Ok(DnsRecordEnvelope { record: None });
        }
        if state.blank_record_id {
            return Ok(DnsRecordEnvelope {
                record: Some(DnsRecord {
                    id: String::new(),
                    ..record
                }),
            });
        }
        Ok(DnsRecordEnvelope {
            record: Some(record),
        })
    }

    async fn delete_vm(&self, id: &str) -> prenv_cloud::Result<()> {
        let mut state = self.state();
        state.calls.delete_vm += 1;
        let before = state.vms.len();
        state.vms.retain(|vm| vm.id != id);
        if state.vms.len() == before {
            return Err(CloudError::ResourceNotFound(format!("instance {}", id)));
        }
        Ok(())
    }

    async fn delete_dns_record(&self, _domain: &str, record_id: &str) -> prenv_cloud::Result<()> {
        let mut state = self.state();
        state.calls.delete_record += 1;
        if state.missing_on_delete.contains(record_id) {
            return Err(CloudError::ResourceNotFound(format!("record {}", record_id)));
        }
        state.records.retain(|r| r.id != record_id);
        Ok(())
    }
}

/// Config for PR 42 on example.com with the default polling budget
#[allow(dead_code)]
pub fn config() -> WorkflowConfig {
    WorkflowConfig::new(
        Environment::new("42", "example.com").unwrap(),
        "ewr",
        "vc2-1c-1gb",
        prenv_core::os_id("ubuntu").unwrap(),
    )
}

/// Same as [`config`] with small polling budgets
#[allow(dead_code)]
pub fn quick_config() -> WorkflowConfig {
    let mut config = config();
    config.ip_poll = PollConfig::new(Duration::from_secs(1), 3);
    config.ready_poll = PollConfig::new(Duration::from_secs(1), 3);
    config.settle_delay = Duration::from_secs(1);
    config
}
