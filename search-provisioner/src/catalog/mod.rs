//! Definitions of every resource the provisioner manages.
//!
//! Three indexes share one suggester; two of them use the relational customer
//! field set and one the table-storage field set.

use search_provisioner_shared::{
    AnalyzerName, ChangeDetectionPolicy, CorsOptions, DataSourceConfig, DataType,
    FieldDefinition, FieldMapping, IndexSchema, IndexerConfig, IndexingSchedule, Suggester,
};

pub const SQL_INDEX: &str = "sql-customers";
pub const STORAGE_INDEX: &str = "storage-users";
pub const COMBINED_INDEX: &str = "sql-blob-index";

pub const SQL_DATA_SOURCE: &str = "azure-sql";
pub const TABLE_DATA_SOURCE: &str = "azure-table";
pub const BLOB_DATA_SOURCE: &str = "azure-blob";

pub const SQL_INDEXER: &str = "azure-sql-indexer";
pub const TABLE_INDEXER: &str = "azure-table-indexer";
pub const BLOB_INDEXER: &str = "azure-blob-indexer";
pub const COMBINED_SQL_INDEXER: &str = "azure-combined-sql-indexer";

pub const SQL_TABLE: &str = "SalesLT.Customer";
pub const STORAGE_TABLE: &str = "users";
pub const BLOB_CONTAINER: &str = "search-data";

pub const SUGGESTER_NAME: &str = "fieldSuggester";
pub const SQL_ALLOWED_ORIGIN: &str = "192.168.1.1";

/// Blob metadata field holding the blob's unique key.
pub const BLOB_KEY_FIELD: &str = "uniqueblobkey";

/// Customer attributes present in both field sets, after the key.
const CUSTOMER_TEXT_FIELDS: [&str; 10] = [
    "NameStyle",
    "Title",
    "FirstName",
    "MiddleName",
    "LastName",
    "Suffix",
    "CompanyName",
    "SalesPerson",
    "EmailAddress",
    "Phone",
];

fn key_field(name: &str) -> FieldDefinition {
    FieldDefinition::new(name, DataType::String)
        .as_key()
        .analyzer(AnalyzerName::EnMicrosoft)
}

fn modified_date_field() -> FieldDefinition {
    FieldDefinition::new("ModifiedDate", DataType::DateTimeOffset)
        .searchable(false)
        .filterable(false)
        .retrievable(true)
        .facetable(true)
        .sortable(true)
}

fn text_field(name: &str) -> FieldDefinition {
    FieldDefinition::new(name, DataType::String)
        .analyzer(AnalyzerName::EnMicrosoft)
        .searchable(true)
        .filterable(false)
        .retrievable(true)
        .facetable(true)
        .sortable(true)
}

fn customer_fields(key: &str) -> Vec<FieldDefinition> {
    let mut fields = vec![key_field(key), modified_date_field()];
    fields.extend(CUSTOMER_TEXT_FIELDS.iter().map(|name| text_field(name)));
    fields
}

/// Fields of the relational customer table, plus the blob `content` field.
pub fn sql_fields() -> Vec<FieldDefinition> {
    let mut fields = customer_fields("CustomerID");
    fields.push(text_field("content"));
    fields
}

/// Fields of the table-storage users table.
pub fn storage_fields() -> Vec<FieldDefinition> {
    customer_fields("Key")
}

/// Type-ahead over first and last names. An index holds at most one suggester.
pub fn field_suggester() -> Suggester {
    Suggester::new(SUGGESTER_NAME, ["FirstName", "LastName"])
}

pub fn sql_customers_index() -> IndexSchema {
    IndexSchema::new(SQL_INDEX, sql_fields())
        .with_suggester(field_suggester())
        .with_cors(CorsOptions::allow([SQL_ALLOWED_ORIGIN]))
}

pub fn storage_users_index() -> IndexSchema {
    IndexSchema::new(STORAGE_INDEX, storage_fields()).with_suggester(field_suggester())
}

pub fn combined_index() -> IndexSchema {
    IndexSchema::new(COMBINED_INDEX, sql_fields()).with_suggester(field_suggester())
}

pub fn sql_data_source(connection_string: &str) -> DataSourceConfig {
    DataSourceConfig::azure_sql(SQL_DATA_SOURCE, connection_string, SQL_TABLE)
        .with_change_detection(ChangeDetectionPolicy::SqlIntegratedChangeTracking)
}

pub fn table_data_source(connection_string: &str) -> DataSourceConfig {
    DataSourceConfig::azure_table_storage(TABLE_DATA_SOURCE, connection_string, STORAGE_TABLE)
}

pub fn blob_data_source(connection_string: &str) -> DataSourceConfig {
    DataSourceConfig::azure_blob_storage(BLOB_DATA_SOURCE, connection_string, BLOB_CONTAINER)
}

pub fn sql_indexer() -> IndexerConfig {
    IndexerConfig::new(SQL_INDEXER, SQL_DATA_SOURCE, SQL_INDEX)
        .with_schedule(IndexingSchedule::daily())
}

pub fn table_indexer() -> IndexerConfig {
    IndexerConfig::new(TABLE_INDEXER, TABLE_DATA_SOURCE, STORAGE_INDEX)
        .with_schedule(IndexingSchedule::daily())
}

/// Blob indexer; the blob key becomes the customer id so blob and relational rows
/// for the same customer merge into one document.
pub fn blob_indexer() -> IndexerConfig {
    IndexerConfig::new(BLOB_INDEXER, BLOB_DATA_SOURCE, COMBINED_INDEX)
        .with_schedule(IndexingSchedule::daily())
        .with_field_mapping(FieldMapping::new(BLOB_KEY_FIELD, "CustomerID"))
}

pub fn combined_sql_indexer() -> IndexerConfig {
    IndexerConfig::new(COMBINED_SQL_INDEXER, SQL_DATA_SOURCE, COMBINED_INDEX)
        .with_schedule(IndexingSchedule::daily())
}
