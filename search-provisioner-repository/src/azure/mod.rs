//! Azure Search implementation of the administrative capability traits.
//!
//! This module provides a concrete implementation of `SearchAdminProvider`
//! over the service's REST API.

mod api;
mod provider;

pub use api::ResourceCollection;
pub use provider::AzureSearchProvider;
