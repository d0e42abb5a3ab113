//! Named outputs exposed to the invoking pipeline

use crate::workflow::Outcome;

/// Whether the VM's root password may leave the process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordPolicy {
    #[default]
    Redact,
    Expose,
}

/// Ordered name/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outputs {
    entries: Vec<(String, String)>,
}

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Outputs for a run that did not complete
    pub fn failed(error: &impl std::fmt::Display) -> Self {
        let mut outputs = Self::new();
        outputs.set("result", "failed");
        outputs.set("error", error.to_string());
        outputs
    }

    /// Outputs for a finished run
    pub fn from_outcome(
        outcome: &Outcome,
        password: PasswordPolicy,
    ) -> Result<Self, serde_json::Error> {
        let mut outputs = Self::new();

        match outcome {
            Outcome::Created(report) => {
                outputs.set("result", "created");
                outputs.set("ip_address", report.ip_address.clone());
                outputs.set("vm_id", report.vm.id.clone());

                let instance = match password {
                    PasswordPolicy::Redact => report.vm.redacted(),
                    PasswordPolicy::Expose => report.vm.clone(),
                };
                outputs.set("instance", serde_json::to_string(&instance)?);

                let record_ids: Vec<&str> =
                    report.dns_records.iter().map(|r| r.id.as_str()).collect();
                outputs.set("dns_record_ids", record_ids.join(","));

                if password == PasswordPolicy::Expose {
                    if let Some(secret) = &report.vm.default_password {
                        outputs.set("default_password", secret.clone());
                    }
                }
            }
            Outcome::Destroyed(report) => {
                outputs.set("result", "destroyed");
                outputs.set(
                    "deleted_count",
                    (report.records.succeeded.len() + report.vms.succeeded.len()).to_string(),
                );
                outputs.set(
                    "failed_count",
                    (report.records.failed.len() + report.vms.failed.len()).to_string(),
                );
                outputs.set(
                    "duration_ms",
                    (report.records.duration_ms + report.vms.duration_ms).to_string(),
                );
            }
            Outcome::NoOp { presence, .. } => {
                outputs.set("result", "noop");
                outputs.set("presence", presence.to_string());
            }
        }

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Action;
    use crate::workflow::{CreateReport, DestroyReport, Presence};
    use prenv_cloud::{BatchResult, DnsRecord, RecordType, VirtualMachine};
    use std::time::Duration;

    fn created() -> Outcome {
        Outcome::Created(CreateReport {
            vm: VirtualMachine {
                id: "vm-1".to_string(),
                label: "42.example.com".to_string(),
                main_ip: "203.0.113.7".to_string(),
                default_password: Some("s3cret".to_string()),
                ..Default::default()
            },
            ip_address: "203.0.113.7".to_string(),
            dns_records: vec![
                DnsRecord {
                    id: "r1".to_string(),
                    record_type: RecordType::A,
                    name: "42".to_string(),
                    data: "203.0.113.7".to_string(),
                    ttl: None,
                    priority: None,
                },
                DnsRecord {
                    id: "r2".to_string(),
                    record_type: RecordType::Cname,
                    name: "*.42".to_string(),
                    data: "42.example.com".to_string(),
                    ttl: None,
                    priority: None,
                },
            ],
            elapsed: Duration::from_secs(120),
        })
    }

    #[test]
    fn test_created_outputs_redact_password() {
        let outputs = Outputs::from_outcome(&created(), PasswordPolicy::Redact).unwrap();

        assert_eq!(outputs.get("result"), Some("created"));
        assert_eq!(outputs.get("ip_address"), Some("203.0.113.7"));
        assert_eq!(outputs.get("vm_id"), Some("vm-1"));
        assert_eq!(outputs.get("dns_record_ids"), Some("r1,r2"));
        assert_eq!(outputs.get("default_password"), None);
        assert!(!outputs.get("instance").unwrap().contains("s3cret"));
    }

    #[test]
    fn test_created_outputs_expose_password() {
        let outputs = Outputs::from_outcome(&created(), PasswordPolicy::Expose).unwrap();

        assert_eq!(outputs.get("default_password"), Some("s3cret"));
        assert!(outputs.get("instance").unwrap().contains("s3cret"));
    }

    #[test]
    fn test_destroyed_and_noop_outputs() {
        let mut records = BatchResult::new();
        records.add_success("DNS record r1");
        records.add_failure("DNS record r2", "not found");
        let mut vms = BatchResult::new();
        vms.add_success("instance v1");
        records.duration_ms = 40;
        vms.duration_ms = 2;

        let outputs = Outputs::from_outcome(
            &Outcome::Destroyed(DestroyReport { records, vms }),
            PasswordPolicy::Redact,
        )
        .unwrap();
        assert_eq!(outputs.get("result"), Some("destroyed"));
        assert_eq!(outputs.get("deleted_count"), Some("2"));
        assert_eq!(outputs.get("failed_count"), Some("1"));
        assert_eq!(outputs.get("duration_ms"), Some("42"));

        let outputs = Outputs::from_outcome(
            &Outcome::NoOp {
                action: Action::Create,
                presence: Presence::PartiallyPresent,
            },
            PasswordPolicy::Redact,
        )
        .unwrap();
        assert_eq!(
            outputs.iter().collect::<Vec<_>>(),
            vec![("result", "noop"), ("presence", "partially present")]
        );
    }

    #[test]
    fn test_failed_run_outputs() {
        let error = crate::error::ProvisionError::PollTimeout {
            vm_id: "vm-1".to_string(),
            attempts: 30,
            waiting_for: "get an IP address",
        };
        let outputs = Outputs::failed(&error);

        assert_eq!(outputs.get("result"), Some("failed"));
        assert_eq!(
            outputs.get("error"),
            Some("VM vm-1 did not get an IP address after 30 attempts")
        );
        assert_eq!(outputs.get("ip_address"), None);
    }
}
