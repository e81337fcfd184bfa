//! # Search Provisioner Repository
//!
//! This crate provides the capability traits for administering a search service
//! (indexes, data sources, indexers), the error type shared by every backend, local
//! validation of resource definitions, and a concrete implementation for the Azure
//! Search REST API.

pub mod azure;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod validation;

pub use azure::AzureSearchProvider;
pub use config::SearchServiceConfig;
pub use errors::SearchAdminError;
pub use interfaces::{DataSourcesAdmin, IndexersAdmin, IndexesAdmin, SearchAdminProvider};
pub use validation::{
    validate_data_source, validate_index_schema, validate_indexer, validate_resource_name,
};
