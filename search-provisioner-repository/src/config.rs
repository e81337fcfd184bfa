//! Configuration types for the search service connection.

use std::fmt;

/// Default REST API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "2020-06-30";

/// Connection settings for a search service.
///
/// `Debug` never prints the admin key.
#[derive(Clone)]
pub struct SearchServiceConfig {
    /// Name of the search service, e.g. `my-search` for `my-search.search.windows.net`.
    pub service_name: String,
    /// Admin API key sent in the `api-key` header.
    pub admin_api_key: String,
    /// REST API version.
    pub api_version: String,
    /// Explicit endpoint overriding the one derived from `service_name`.
    pub endpoint: Option<String>,
}

impl SearchServiceConfig {
    /// Create a config for the public endpoint of the named service.
    pub fn new(service_name: impl Into<String>, admin_api_key: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            admin_api_key: admin_api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            endpoint: None,
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// The base URL requests are sent to.
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.search.windows.net", self.service_name),
        }
    }
}

impl fmt::Debug for SearchServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchServiceConfig")
            .field("service_name", &self.service_name)
            .field("admin_api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
