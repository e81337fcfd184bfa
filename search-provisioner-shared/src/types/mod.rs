//! This module defines the resource definitions used across the search provisioner.
//! It re-exports the schema, data source and indexer types.

pub mod data_source;
pub mod index_schema;
pub mod indexer;
pub mod interval;

pub use data_source::DataSourceConfig;
pub use index_schema::IndexSchema;
pub use indexer::IndexerConfig;
