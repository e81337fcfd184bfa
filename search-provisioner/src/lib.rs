//! # Search Provisioner
//!
//! Provisions a fixed set of search indexes, data sources and indexers on an Azure
//! Search service. Every run converges the service on the same end state, so the
//! binary can be re-run at any time.
//!
//! ## Architecture
//!
//! 1. **Catalog**: the definitions of every managed resource
//! 2. **Provisioner**: reconciles one resource at a time against the service
//! 3. **Pipelines**: the fixed order in which resources are reconciled
//!
//! ## Modules
//!
//! - [`catalog`]: Field sets, suggester, indexes, data sources and indexers
//! - [`config`]: Configuration and dependency initialization
//! - [`errors`]: Error types for the provisioner
//! - [`pipelines`]: The provisioning sequence and its report
//! - [`provisioner`]: Per-resource reconciliation

pub mod catalog;
pub mod config;
pub mod errors;
pub mod pipelines;
pub mod provisioner;

pub use config::{DataSourceConnections, Dependencies, ProvisionerConfig};
pub use errors::ProvisionError;
pub use pipelines::{PipelineRunner, ProvisioningReport};
pub use provisioner::Provisioner;
