//! The fixed provisioning sequence.
//!
//! Three pipelines run one after another, each reconciling an index, its data
//! source(s) and its indexer(s):
//!
//! 1. **Relational**: customers table into `sql-customers`, then an immediate run
//! 2. **Table storage**: users table into `storage-users`, left to its schedule
//! 3. **Combined**: blob container and customers table into `sql-blob-index`, then an
//!    immediate run of both indexers
//!
//! The first failure aborts the sequence. Resources reconciled before it stay as they
//! are.

use std::fmt;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::catalog;
use crate::config::DataSourceConnections;
use crate::errors::ProvisionError;
use crate::provisioner::Provisioner;

/// What a provisioning run reconciled, in the order it happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisioningReport {
    pub indexes: Vec<String>,
    pub data_sources: Vec<String>,
    pub indexers: Vec<String>,
    /// Indexers asked to run immediately.
    pub runs: Vec<String>,
}

impl ProvisioningReport {
    fn merge(&mut self, other: ProvisioningReport) {
        self.indexes.extend(other.indexes);
        self.data_sources.extend(other.data_sources);
        self.indexers.extend(other.indexers);
        self.runs.extend(other.runs);
    }
}

impl fmt::Display for ProvisioningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Indexes:      {}", self.indexes.join(", "))?;
        writeln!(f, "Data sources: {}", self.data_sources.join(", "))?;
        writeln!(f, "Indexers:     {}", self.indexers.join(", "))?;
        write!(f, "Runs:         {}", self.runs.join(", "))
    }
}

/// Runs the three pipelines against a provisioner.
pub struct PipelineRunner {
    provisioner: Arc<Provisioner>,
}

impl PipelineRunner {
    pub fn new(provisioner: Arc<Provisioner>) -> Self {
        Self { provisioner }
    }

    /// Run every pipeline in order.
    ///
    /// Safe to repeat: a second run leaves the service with the same three indexes,
    /// three data sources and four indexers as the first.
    #[instrument(skip_all)]
    pub async fn run_all(
        &self,
        connections: &DataSourceConnections,
    ) -> Result<ProvisioningReport, ProvisionError> {
        info!("Creating indexes");

        let mut report = self.run_relational(connections).await?;
        report.merge(self.run_table(connections).await?);
        report.merge(self.run_combined(connections).await?);

        info!(
            indexes = report.indexes.len(),
            data_sources = report.data_sources.len(),
            indexers = report.indexers.len(),
            runs = report.runs.len(),
            "Provisioning complete"
        );
        Ok(report)
    }

    /// Relational customers into `sql-customers`.
    #[instrument(skip_all)]
    pub async fn run_relational(
        &self,
        connections: &DataSourceConnections,
    ) -> Result<ProvisioningReport, ProvisionError> {
        let mut report = ProvisioningReport::default();

        info!("Creating SQL index");
        let index = self
            .provisioner
            .reconcile_index(catalog::sql_customers_index())
            .await?;
        report.indexes.push(index.name.clone());

        info!("Creating SQL data source");
        let data_source = self
            .provisioner
            .reconcile_data_source(catalog::sql_data_source(&connections.sql))
            .await?;
        report.data_sources.push(data_source.name.clone());

        info!("Creating SQL indexer");
        let indexer = self
            .provisioner
            .reconcile_indexer(catalog::sql_indexer(), &index.name, &data_source.name)
            .await?;
        report.indexers.push(indexer.name.clone());

        info!("Running SQL indexer");
        self.provisioner.run_indexer_now(&indexer.name).await?;
        report.runs.push(indexer.name);

        Ok(report)
    }

    /// Table-storage users into `storage-users`.
    ///
    /// The indexer is registered but not run; it first fires on its schedule.
    #[instrument(skip_all)]
    pub async fn run_table(
        &self,
        connections: &DataSourceConnections,
    ) -> Result<ProvisioningReport, ProvisionError> {
        let mut report = ProvisioningReport::default();

        info!("Creating table storage index");
        let index = self
            .provisioner
            .reconcile_index(catalog::storage_users_index())
            .await?;
        report.indexes.push(index.name.clone());

        info!("Creating table storage data source");
        let data_source = self
            .provisioner
            .reconcile_data_source(catalog::table_data_source(&connections.table))
            .await?;
        report.data_sources.push(data_source.name.clone());

        info!("Creating table storage indexer");
        let indexer = self
            .provisioner
            .reconcile_indexer(catalog::table_indexer(), &index.name, &data_source.name)
            .await?;
        report.indexers.push(indexer.name);

        Ok(report)
    }

    /// Blob documents and relational customers merged into `sql-blob-index`.
    ///
    /// The relational data source is upserted again so the combined indexer binds to
    /// its current definition. It is already listed by the relational pipeline, so the
    /// report leaves it out here.
    #[instrument(skip_all)]
    pub async fn run_combined(
        &self,
        connections: &DataSourceConnections,
    ) -> Result<ProvisioningReport, ProvisionError> {
        let mut report = ProvisioningReport::default();

        info!("Creating combined index");
        let index = self
            .provisioner
            .reconcile_index(catalog::combined_index())
            .await?;
        report.indexes.push(index.name.clone());

        info!("Creating blob data source");
        let blob = self
            .provisioner
            .reconcile_data_source(catalog::blob_data_source(&connections.blob))
            .await?;
        report.data_sources.push(blob.name.clone());

        info!("Updating SQL data source");
        let sql = self
            .provisioner
            .reconcile_data_source(catalog::sql_data_source(&connections.sql))
            .await?;

        info!("Creating blob indexer");
        let blob_indexer = self
            .provisioner
            .reconcile_indexer(catalog::blob_indexer(), &index.name, &blob.name)
            .await?;
        report.indexers.push(blob_indexer.name.clone());

        info!("Creating combined SQL indexer");
        let sql_indexer = self
            .provisioner
            .reconcile_indexer(catalog::combined_sql_indexer(), &index.name, &sql.name)
            .await?;
        report.indexers.push(sql_indexer.name.clone());

        info!("Running blob and combined SQL indexers");
        self.provisioner.run_indexer_now(&blob_indexer.name).await?;
        report.runs.push(blob_indexer.name);
        self.provisioner.run_indexer_now(&sql_indexer.name).await?;
        report.runs.push(sql_indexer.name);

        Ok(report)
    }
}
