//! Search administration capability traits.
//!
//! The administrative API is split into three capability groups, one per resource
//! kind. `SearchAdminProvider` is the combination the provisioner depends on.

use async_trait::async_trait;

use search_provisioner_shared::{DataSourceConfig, IndexSchema, IndexerConfig};

use crate::errors::SearchAdminError;

/// Management of index schemas.
#[async_trait]
pub trait IndexesAdmin: Send + Sync {
    /// Check whether an index with the given name exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index exists
    /// * `Ok(false)` - If the service reports it as not found
    /// * `Err(SearchAdminError)` - If the check itself fails
    async fn index_exists(&self, name: &str) -> Result<bool, SearchAdminError>;

    /// Create a new index from the schema.
    ///
    /// Fails if an index with the same name already exists.
    async fn create_index(&self, schema: &IndexSchema) -> Result<(), SearchAdminError>;

    /// Delete an index together with every document it holds.
    ///
    /// Deleting an index that does not exist is not an error.
    async fn delete_index(&self, name: &str) -> Result<(), SearchAdminError>;
}

/// Management of data source registrations.
#[async_trait]
pub trait DataSourcesAdmin: Send + Sync {
    /// Create the data source, or replace the existing definition with the same name.
    async fn create_or_update_data_source(
        &self,
        config: &DataSourceConfig,
    ) -> Result<(), SearchAdminError>;
}

/// Management of indexers.
#[async_trait]
pub trait IndexersAdmin: Send + Sync {
    /// Check whether an indexer with the given name exists.
    async fn indexer_exists(&self, name: &str) -> Result<bool, SearchAdminError>;

    /// Clear the indexer's change-tracking state so the next run reprocesses every
    /// source row.
    async fn reset_indexer(&self, name: &str) -> Result<(), SearchAdminError>;

    /// Create the indexer, or replace the existing definition with the same name.
    async fn create_or_update_indexer(
        &self,
        config: &IndexerConfig,
    ) -> Result<(), SearchAdminError>;

    /// Start an out-of-schedule run.
    ///
    /// Returns once the service has accepted the request; the run itself proceeds
    /// asynchronously on the service.
    async fn run_indexer(&self, name: &str) -> Result<(), SearchAdminError>;
}

/// The full administrative client: every capability group.
///
/// Implemented automatically for any type implementing all three groups, so an
/// `Arc<dyn SearchAdminProvider>` can be shared by the provisioner and handed a live
/// client or a test double alike.
pub trait SearchAdminProvider: IndexesAdmin + DataSourcesAdmin + IndexersAdmin {}

impl<T> SearchAdminProvider for T where T: IndexesAdmin + DataSourcesAdmin + IndexersAdmin {}
