//! # Search Provisioner Shared
//!
//! This crate defines the resource definitions shared across the search provisioner:
//! index schemas, data source registrations and indexer registrations. Each type
//! serializes to the JSON body the search service's administrative API expects.

pub mod types;

pub use types::data_source::{
    ChangeDetectionPolicy, DataContainer, DataSourceConfig, DataSourceCredentials, DataSourceKind,
};
pub use types::index_schema::{
    AnalyzerName, CorsOptions, DataType, FieldDefinition, IndexSchema, Suggester,
    SuggesterSearchMode,
};
pub use types::indexer::{FieldMapping, IndexerConfig, IndexingSchedule};
