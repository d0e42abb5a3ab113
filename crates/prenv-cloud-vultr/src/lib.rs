//! Vultr provider for prenv
//!
//! This crate implements the [`CloudApi`](prenv_cloud::CloudApi) trait on top
//! of the Vultr v2 REST API, covering instances and DNS records.
//!
//! # Requirements
//!
//! - A Vultr API key with access to instances and DNS
//! - The target domain must already be managed by Vultr DNS
//!
//! # Example
//!
//! ```ignore
//! use prenv_cloud::{CloudApi, PageRequest};
//! use prenv_cloud_vultr::{VultrClient, VultrConfig};
//!
//! let client = VultrClient::new(VultrConfig::new(api_key))?;
//! let page = client.list_vms(Some("ewr"), &PageRequest::first()).await?;
//! ```

pub mod client;
pub mod error;
mod provider;

pub use client::{VULTR_API_BASE, VultrClient, VultrConfig};
pub use error::{Result, VultrError};
