//! Azure Search provider implementation.
//!
//! This module provides the concrete implementation of the administrative
//! capability traits over the service's REST API using `reqwest`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, error, info};
use url::Url;

use search_provisioner_shared::{DataSourceConfig, IndexSchema, IndexerConfig};

use crate::azure::api::{self, ResourceCollection, API_KEY_HEADER};
use crate::config::SearchServiceConfig;
use crate::errors::SearchAdminError;
use crate::interfaces::{DataSourcesAdmin, IndexersAdmin, IndexesAdmin};

/// Azure Search administrative client.
///
/// Sends the admin key with every request and awaits each response before
/// returning. No retries and no explicit timeouts: the HTTP client's defaults
/// apply.
///
/// # Example
///
/// ```no_run
/// use search_provisioner_repository::{AzureSearchProvider, IndexesAdmin, SearchServiceConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SearchServiceConfig::new("my-search", "admin-key");
/// let provider = AzureSearchProvider::new(&config)?;
///
/// if provider.index_exists("sql-customers").await? {
///     provider.delete_index("sql-customers").await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct AzureSearchProvider {
    client: Client,
    endpoint: Url,
    api_version: String,
}

impl AzureSearchProvider {
    /// Create a new provider for the configured service.
    ///
    /// # Returns
    ///
    /// * `Ok(AzureSearchProvider)` - A new provider instance
    /// * `Err(SearchAdminError)` - If the endpoint or the admin key is malformed, or
    ///   the HTTP client cannot be built
    pub fn new(config: &SearchServiceConfig) -> Result<Self, SearchAdminError> {
        let endpoint_url = config.endpoint_url();
        let endpoint =
            Url::parse(&endpoint_url).map_err(|e| SearchAdminError::connection(e.to_string()))?;

        let mut api_key = HeaderValue::from_str(&config.admin_api_key).map_err(|_| {
            SearchAdminError::validation("admin API key contains characters not allowed in a header")
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SearchAdminError::connection(e.to_string()))?;

        info!(
            endpoint = %endpoint,
            api_version = %config.api_version,
            "Created Azure Search provider"
        );

        Ok(Self {
            client,
            endpoint,
            api_version: config.api_version.clone(),
        })
    }

    fn url(
        &self,
        collection: ResourceCollection,
        name: Option<&str>,
        action: Option<&str>,
    ) -> Result<Url, SearchAdminError> {
        api::build_url(&self.endpoint, &self.api_version, collection, name, action)
    }

    fn body<T: Serialize>(value: &T) -> Result<serde_json::Value, SearchAdminError> {
        serde_json::to_value(value).map_err(|e| SearchAdminError::serialization(e.to_string()))
    }

    /// Turn a rejected response into an error, logging the body.
    async fn failure(response: Response, operation: &str) -> SearchAdminError {
        let status = response.status();
        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, operation, "Request failed");
        api::status_error(operation, status.as_u16(), &error_body)
    }

    async fn ensure_success(response: Response, operation: &str) -> Result<(), SearchAdminError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::failure(response, operation).await)
    }

    /// Interpret the response of a `GET` on a named resource.
    async fn exists_from(response: Response, operation: &str) -> Result<bool, SearchAdminError> {
        match api::existence_from_status(response.status()) {
            Some(exists) => Ok(exists),
            None => Err(Self::failure(response, operation).await),
        }
    }
}

#[async_trait]
impl IndexesAdmin for AzureSearchProvider {
    async fn index_exists(&self, name: &str) -> Result<bool, SearchAdminError> {
        let url = self.url(ResourceCollection::Indexes, Some(name), None)?;
        debug!(url = %url, "Checking index existence");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchAdminError::index(e.to_string()))?;

        Self::exists_from(response, "get index").await
    }

    async fn create_index(&self, schema: &IndexSchema) -> Result<(), SearchAdminError> {
        let url = self.url(ResourceCollection::Indexes, None, None)?;
        debug!(url = %url, index = %schema.name, "Creating index");

        let response = self
            .client
            .post(url)
            .json(&Self::body(schema)?)
            .send()
            .await
            .map_err(|e| SearchAdminError::index(e.to_string()))?;

        Self::ensure_success(response, "create index").await?;
        debug!(index = %schema.name, fields = schema.fields.len(), "Index created");
        Ok(())
    }

    async fn delete_index(&self, name: &str) -> Result<(), SearchAdminError> {
        let url = self.url(ResourceCollection::Indexes, Some(name), None)?;
        debug!(url = %url, "Deleting index");

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| SearchAdminError::index(e.to_string()))?;

        let status = response.status();
        if !api::deleted_from_status(status) {
            return Err(Self::failure(response, "delete index").await);
        }

        if status == StatusCode::NOT_FOUND {
            debug!(index = %name, "Index already absent");
        } else {
            debug!(index = %name, "Index deleted");
        }
        Ok(())
    }
}

#[async_trait]
impl DataSourcesAdmin for AzureSearchProvider {
    async fn create_or_update_data_source(
        &self,
        config: &DataSourceConfig,
    ) -> Result<(), SearchAdminError> {
        let url = self.url(ResourceCollection::DataSources, Some(&config.name), None)?;
        debug!(url = %url, kind = %config.kind, "Upserting data source");

        let response = self
            .client
            .put(url)
            .json(&Self::body(config)?)
            .send()
            .await
            .map_err(|e| SearchAdminError::data_source(e.to_string()))?;

        Self::ensure_success(response, "create or update data source").await?;
        debug!(data_source = %config.name, "Data source upserted");
        Ok(())
    }
}

#[async_trait]
impl IndexersAdmin for AzureSearchProvider {
    async fn indexer_exists(&self, name: &str) -> Result<bool, SearchAdminError> {
        let url = self.url(ResourceCollection::Indexers, Some(name), None)?;
        debug!(url = %url, "Checking indexer existence");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchAdminError::indexer(e.to_string()))?;

        Self::exists_from(response, "get indexer").await
    }

    async fn reset_indexer(&self, name: &str) -> Result<(), SearchAdminError> {
        let url = self.url(ResourceCollection::Indexers, Some(name), Some("reset"))?;
        debug!(url = %url, "Resetting indexer");

        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| SearchAdminError::indexer(e.to_string()))?;

        Self::ensure_success(response, "reset indexer").await
    }

    async fn create_or_update_indexer(
        &self,
        config: &IndexerConfig,
    ) -> Result<(), SearchAdminError> {
        let url = self.url(ResourceCollection::Indexers, Some(&config.name), None)?;
        debug!(url = %url, "Upserting indexer");

        let response = self
            .client
            .put(url)
            .json(&Self::body(config)?)
            .send()
            .await
            .map_err(|e| SearchAdminError::indexer(e.to_string()))?;

        Self::ensure_success(response, "create or update indexer").await?;
        debug!(indexer = %config.name, "Indexer upserted");
        Ok(())
    }

    async fn run_indexer(&self, name: &str) -> Result<(), SearchAdminError> {
        let url = self.url(ResourceCollection::Indexers, Some(name), Some("run"))?;
        debug!(url = %url, "Requesting indexer run");

        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| SearchAdminError::indexer(e.to_string()))?;

        Self::ensure_success(response, "run indexer").await
    }
}
