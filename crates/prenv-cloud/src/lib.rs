//! prenv cloud abstraction
//!
//! This crate defines the capability interface the preview-environment
//! orchestrator talks to, together with the resource model it exchanges
//! with a cloud provider.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    prenv CLI                     │
//! │               (create / destroy)                 │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                  prenv-core                      │
//! │   fetch · mutate · poll · reconcile · workflow   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                  prenv-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        trait CloudApi { ... }            │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │    Model     │  │ BatchResult  │            │
//! │  └──────────────┘  └──────────────┘            │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │     vultr     │
//!           │    binding    │
//!           └───────────────┘
//! ```

pub mod batch;
pub mod error;
pub mod model;
pub mod provider;

// Re-exports
pub use batch::{BatchResult, ItemResult};
pub use error::{CloudError, Result};
pub use model::{
    CreateDnsRecordRequest, CreateVmRequest, DnsRecord, DnsRecordEnvelope, RecordType,
    UNASSIGNED_IP, VirtualMachine, VmEnvelope,
};
pub use provider::{CloudApi, DEFAULT_PAGE_SIZE, Page, PageRequest};
