//! Data source registration types.
//!
//! A data source is a named connection descriptor pointing at an external store
//! that an indexer crawls.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of store behind a data source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DataSourceKind {
    /// A table or view in a relational database.
    #[serde(rename = "azuresql")]
    AzureSql,
    /// A table in table storage.
    #[serde(rename = "azuretable")]
    AzureTable,
    /// A container in blob storage.
    #[serde(rename = "azureblob")]
    AzureBlob,
}

impl DataSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceKind::AzureSql => "azuresql",
            DataSourceKind::AzureTable => "azuretable",
            DataSourceKind::AzureBlob => "azureblob",
        }
    }
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credentials used by the service to reach the store.
///
/// `Debug` never prints the connection string.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceCredentials {
    pub connection_string: String,
}

impl fmt::Debug for DataSourceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceCredentials")
            .field("connection_string", &"<redacted>")
            .finish()
    }
}

/// The table, view or container read from the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataContainer {
    pub name: String,
    /// Optional store-specific query, e.g. a blob virtual directory prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// How the service detects rows that changed since the last indexer run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "@odata.type")]
pub enum ChangeDetectionPolicy {
    /// The relational database's integrated change tracking.
    #[serde(rename = "#Microsoft.Azure.Search.SqlIntegratedChangeTrackingPolicy")]
    SqlIntegratedChangeTracking,
    /// A monotonically increasing column such as a rowversion or last-modified time.
    #[serde(
        rename = "#Microsoft.Azure.Search.HighWaterMarkChangeDetectionPolicy",
        rename_all = "camelCase"
    )]
    HighWaterMark { high_water_mark_column_name: String },
}

/// Registration of a data source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DataSourceKind,
    pub credentials: DataSourceCredentials,
    pub container: DataContainer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_change_detection_policy: Option<ChangeDetectionPolicy>,
}

impl DataSourceConfig {
    fn new(
        name: impl Into<String>,
        kind: DataSourceKind,
        connection_string: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            credentials: DataSourceCredentials {
                connection_string: connection_string.into(),
            },
            container: DataContainer {
                name: container.into(),
                query: None,
            },
            data_change_detection_policy: None,
        }
    }

    /// A relational table or view.
    pub fn azure_sql(
        name: impl Into<String>,
        connection_string: impl Into<String>,
        table_or_view: impl Into<String>,
    ) -> Self {
        Self::new(name, DataSourceKind::AzureSql, connection_string, table_or_view)
    }

    /// A table storage table.
    pub fn azure_table_storage(
        name: impl Into<String>,
        connection_string: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self::new(name, DataSourceKind::AzureTable, connection_string, table)
    }

    /// A blob storage container.
    pub fn azure_blob_storage(
        name: impl Into<String>,
        connection_string: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self::new(name, DataSourceKind::AzureBlob, connection_string, container)
    }

    pub fn with_change_detection(mut self, policy: ChangeDetectionPolicy) -> Self {
        self.data_change_detection_policy = Some(policy);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.container.query = Some(query.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sql_data_source_body() {
        let source = DataSourceConfig::azure_sql("azure-sql", "Server=db;", "SalesLT.Customer")
            .with_change_detection(ChangeDetectionPolicy::SqlIntegratedChangeTracking);

        assert_eq!(
            serde_json::to_value(&source).unwrap(),
            json!({
                "name": "azure-sql",
                "type": "azuresql",
                "credentials": { "connectionString": "Server=db;" },
                "container": { "name": "SalesLT.Customer" },
                "dataChangeDetectionPolicy": {
                    "@odata.type": "#Microsoft.Azure.Search.SqlIntegratedChangeTrackingPolicy"
                }
            })
        );
    }

    #[test]
    fn test_high_water_mark_policy_body() {
        let policy = ChangeDetectionPolicy::HighWaterMark {
            high_water_mark_column_name: "_ts".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&policy).unwrap(),
            json!({
                "@odata.type": "#Microsoft.Azure.Search.HighWaterMarkChangeDetectionPolicy",
                "highWaterMarkColumnName": "_ts"
            })
        );
    }

    #[test]
    fn test_blob_data_source_with_query() {
        let source = DataSourceConfig::azure_blob_storage("azure-blob", "conn", "search-data")
            .with_query("customers/");
        let value = serde_json::to_value(&source).unwrap();

        assert_eq!(value["type"], "azureblob");
        assert_eq!(
            value["container"],
            json!({ "name": "search-data", "query": "customers/" })
        );
        assert!(value.get("dataChangeDetectionPolicy").is_none());
    }

    #[test]
    fn test_table_data_source_kind() {
        let source = DataSourceConfig::azure_table_storage("azure-table", "conn", "users");
        assert_eq!(source.kind, DataSourceKind::AzureTable);
        assert_eq!(source.kind.to_string(), "azuretable");
        assert_eq!(source.container.name, "users");
    }

    #[test]
    fn test_debug_redacts_connection_string() {
        let source = DataSourceConfig::azure_sql("azure-sql", "Password=hunter2", "t");
        let rendered = format!("{:?}", source);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
