//! Dependency initialization and wiring for the search provisioner.

use std::sync::Arc;

use tracing::info;

use search_provisioner_repository::{AzureSearchProvider, SearchAdminProvider};

use crate::config::ProvisionerConfig;
use crate::errors::ProvisionError;
use crate::pipelines::PipelineRunner;
use crate::provisioner::Provisioner;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured pipeline runner ready to run.
    pub runner: PipelineRunner,
}

impl Dependencies {
    /// Build the search client and everything on top of it.
    ///
    /// No remote call is made here; the first one is the existence check of the
    /// first index.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ProvisionError)` - If the search client cannot be created
    pub fn new(config: &ProvisionerConfig) -> Result<Self, ProvisionError> {
        info!(
            service_name = %config.search.service_name,
            endpoint = %config.search.endpoint_url(),
            api_version = %config.search.api_version,
            "Initializing dependencies"
        );

        let client = AzureSearchProvider::new(&config.search).map_err(|e| {
            ProvisionError::config(format!("Failed to create search client: {}", e))
        })?;
        let client: Arc<dyn SearchAdminProvider> = Arc::new(client);

        Ok(Self::with_client(client))
    }

    /// Wire the pipeline runner over an existing client.
    pub fn with_client(client: Arc<dyn SearchAdminProvider>) -> Self {
        let provisioner = Arc::new(Provisioner::new(client));
        let runner = PipelineRunner::new(provisioner);

        Self { runner }
    }
}
