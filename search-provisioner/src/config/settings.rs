//! Provisioner configuration read from the environment.

use std::env;
use std::fmt;

use search_provisioner_repository::config::DEFAULT_API_VERSION;
use search_provisioner_repository::SearchServiceConfig;

use crate::errors::ProvisionError;

pub const SEARCH_SERVICE_NAME: &str = "SEARCH_SERVICE_NAME";
pub const SEARCH_ADMIN_API_KEY: &str = "SEARCH_ADMIN_API_KEY";
pub const SEARCH_API_VERSION: &str = "SEARCH_API_VERSION";
pub const SEARCH_ENDPOINT: &str = "SEARCH_ENDPOINT";
pub const AZURE_SQL_CONNECTION_STRING: &str = "AZURE_SQL_CONNECTION_STRING";
pub const AZURE_TABLE_CONNECTION_STRING: &str = "AZURE_TABLE_CONNECTION_STRING";
pub const AZURE_BLOB_CONNECTION_STRING: &str = "AZURE_BLOB_CONNECTION_STRING";
pub const PROVISIONER_PAUSE_ON_EXIT: &str = "PROVISIONER_PAUSE_ON_EXIT";

/// Connection strings of the stores the data sources point at.
///
/// `Debug` never prints the connection strings.
#[derive(Clone)]
pub struct DataSourceConnections {
    pub sql: String,
    pub table: String,
    pub blob: String,
}

impl fmt::Debug for DataSourceConnections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceConnections")
            .field("sql", &"<redacted>")
            .field("table", &"<redacted>")
            .field("blob", &"<redacted>")
            .finish()
    }
}

/// Everything the provisioner needs, built once at startup.
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
    pub search: SearchServiceConfig,
    pub connections: DataSourceConnections,
    /// Wait for the operator to press Enter before exiting.
    pub pause_on_exit: bool,
}

impl ProvisionerConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_SERVICE_NAME`: Search service name (required)
    /// - `SEARCH_ADMIN_API_KEY`: Admin API key (required)
    /// - `AZURE_SQL_CONNECTION_STRING`: Relational database connection string (required)
    /// - `AZURE_TABLE_CONNECTION_STRING`: Table storage connection string (required)
    /// - `AZURE_BLOB_CONNECTION_STRING`: Blob storage connection string (required)
    /// - `SEARCH_API_VERSION`: REST API version (default: 2020-06-30)
    /// - `SEARCH_ENDPOINT`: Endpoint override (default: https://{service}.search.windows.net)
    /// - `PROVISIONER_PAUSE_ON_EXIT`: "true" or "false" (default: true)
    pub fn from_env() -> Result<Self, ProvisionError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProvisionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, ProvisionError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ProvisionError::config(format!("{} must be set", key)))
        };

        let service_name = required(SEARCH_SERVICE_NAME)?;
        let admin_api_key = required(SEARCH_ADMIN_API_KEY)?;
        let connections = DataSourceConnections {
            sql: required(AZURE_SQL_CONNECTION_STRING)?,
            table: required(AZURE_TABLE_CONNECTION_STRING)?,
            blob: required(AZURE_BLOB_CONNECTION_STRING)?,
        };

        let api_version =
            lookup(SEARCH_API_VERSION).unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let mut search = SearchServiceConfig::new(service_name, admin_api_key)
            .with_api_version(api_version);
        if let Some(endpoint) = lookup(SEARCH_ENDPOINT).filter(|v| !v.is_empty()) {
            search = search.with_endpoint(endpoint);
        }

        let pause_on_exit = match lookup(PROVISIONER_PAUSE_ON_EXIT) {
            None => true,
            Some(value) => parse_flag(PROVISIONER_PAUSE_ON_EXIT, &value)?,
        };

        Ok(Self {
            search,
            connections,
            pause_on_exit,
        })
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ProvisionError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ProvisionError::config(format!(
            "{} must be true or false, got '{}'",
            key, other
        ))),
    }
}
