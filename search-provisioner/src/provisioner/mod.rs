//! Reconciliation of individual search resources.
//!
//! Each operation brings one named resource on the service in line with its local
//! definition and is safe to re-run:
//!
//! - indexes are deleted and recreated, discarding previously indexed documents;
//! - data sources are upserted without an existence check;
//! - indexers are reset when they already exist, then upserted.
//!
//! Every definition is validated locally before the first remote call, and every
//! remote call is awaited before the next one is issued. Remote failures are
//! returned unchanged; nothing is retried or rolled back.

use std::sync::Arc;

use tracing::{info, instrument};

use search_provisioner_repository::{
    validate_data_source, validate_index_schema, validate_indexer, validate_resource_name,
    DataSourcesAdmin, IndexersAdmin, IndexesAdmin, SearchAdminError, SearchAdminProvider,
};
use search_provisioner_shared::{DataSourceConfig, IndexSchema, IndexerConfig};

/// Reconciles resources through a shared administrative client.
pub struct Provisioner {
    client: Arc<dyn SearchAdminProvider>,
}

impl Provisioner {
    /// Create a provisioner over the given client.
    pub fn new(client: Arc<dyn SearchAdminProvider>) -> Self {
        Self { client }
    }

    /// Replace the index with a freshly created one.
    ///
    /// If an index with the same name exists it is deleted first, together with
    /// every document it holds.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexSchema)` - The schema the index was created from
    /// * `Err(SearchAdminError::ValidationError)` - If the schema is invalid; no remote
    ///   call was made
    /// * `Err(SearchAdminError)` - If a remote call failed
    #[instrument(skip(self, schema), fields(index = %schema.name))]
    pub async fn reconcile_index(
        &self,
        schema: IndexSchema,
    ) -> Result<IndexSchema, SearchAdminError> {
        validate_index_schema(&schema)?;

        if self.client.index_exists(&schema.name).await? {
            info!("Index already exists, deleting it");
            self.client.delete_index(&schema.name).await?;
        }

        self.client.create_index(&schema).await?;
        info!(fields = schema.fields.len(), "Index created");
        Ok(schema)
    }

    /// Create the data source or overwrite its existing definition.
    ///
    /// Data sources carry no indexing state, so there is no existence check.
    #[instrument(skip(self, config), fields(data_source = %config.name, kind = %config.kind))]
    pub async fn reconcile_data_source(
        &self,
        config: DataSourceConfig,
    ) -> Result<DataSourceConfig, SearchAdminError> {
        validate_data_source(&config)?;

        self.client.create_or_update_data_source(&config).await?;
        info!("Data source created or updated");
        Ok(config)
    }

    /// Bind the indexer to the given index and data source, reset it if it already
    /// exists, then create or update it.
    ///
    /// The reset clears the indexer's change-tracking state so the next run
    /// reprocesses every source row.
    #[instrument(skip(self, config), fields(indexer = %config.name))]
    pub async fn reconcile_indexer(
        &self,
        config: IndexerConfig,
        target_index_name: &str,
        data_source_name: &str,
    ) -> Result<IndexerConfig, SearchAdminError> {
        let config = config.bound_to(target_index_name, data_source_name);
        validate_indexer(&config)?;

        if self.client.indexer_exists(&config.name).await? {
            info!("Indexer already exists, resetting it");
            self.client.reset_indexer(&config.name).await?;
        }

        self.client.create_or_update_indexer(&config).await?;
        info!(
            target_index = %config.target_index_name,
            data_source = %config.data_source_name,
            field_mappings = config.field_mappings.len(),
            "Indexer created or updated"
        );
        Ok(config)
    }

    /// Ask the service to run the indexer now, outside its schedule.
    ///
    /// Returns as soon as the service accepts the request.
    #[instrument(skip(self))]
    pub async fn run_indexer_now(&self, name: &str) -> Result<(), SearchAdminError> {
        validate_resource_name("indexer", name)?;

        self.client.run_indexer(name).await?;
        info!("Indexer run requested");
        Ok(())
    }
}
