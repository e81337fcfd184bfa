//! Local validation of resource definitions.
//!
//! Every definition is checked here before it is sent to the service, so a broken
//! schema is rejected without any remote call being made.

use std::collections::HashSet;
use std::time::Duration;

use search_provisioner_shared::{DataSourceConfig, DataType, IndexSchema, IndexerConfig};

use crate::errors::SearchAdminError;

/// Longest resource name the service accepts.
pub const MAX_RESOURCE_NAME_LEN: usize = 128;

/// Shortest schedule interval the service accepts.
pub const MIN_SCHEDULE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Longest schedule interval the service accepts.
pub const MAX_SCHEDULE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Validate the name of an index, data source or indexer.
///
/// Names are 1 to 128 characters of lowercase ASCII letters, digits, dashes and
/// underscores, and start with a letter or digit.
///
/// # Example
///
/// ```
/// use search_provisioner_repository::validation::validate_resource_name;
///
/// assert!(validate_resource_name("index", "sql-customers").is_ok());
/// assert!(validate_resource_name("index", "SqlCustomers").is_err());
/// ```
pub fn validate_resource_name(kind: &str, name: &str) -> Result<(), SearchAdminError> {
    if name.is_empty() {
        return Err(SearchAdminError::validation(format!("{} name is required", kind)));
    }

    if name.len() > MAX_RESOURCE_NAME_LEN {
        return Err(SearchAdminError::validation(format!(
            "{} name '{}' is longer than {} characters",
            kind, name, MAX_RESOURCE_NAME_LEN
        )));
    }

    let starts_ok = name
        .chars()
        .next()
        .map(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .unwrap_or(false);
    if !starts_ok {
        return Err(SearchAdminError::validation(format!(
            "{} name '{}' must start with a lowercase letter or digit",
            kind, name
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(SearchAdminError::validation(format!(
            "{} name '{}' contains invalid characters. Only lowercase letters, digits, dashes and underscores are allowed",
            kind, name
        )));
    }

    Ok(())
}

/// Validate an index schema.
///
/// Checks the index name, that exactly one field is the key and is a string, that
/// field names are present and unique, that analyzers sit only on text fields, and
/// that the suggester (if any) draws from existing text fields.
pub fn validate_index_schema(schema: &IndexSchema) -> Result<(), SearchAdminError> {
    validate_resource_name("index", &schema.name)?;

    if schema.fields.is_empty() {
        return Err(SearchAdminError::validation(format!(
            "index '{}' has no fields",
            schema.name
        )));
    }

    let mut seen = HashSet::new();
    for field in &schema.fields {
        if field.name.is_empty() {
            return Err(SearchAdminError::validation(format!(
                "index '{}' has a field without a name",
                schema.name
            )));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(SearchAdminError::validation(format!(
                "index '{}' defines field '{}' more than once",
                schema.name, field.name
            )));
        }
        if field.analyzer.is_some() && !field.data_type.is_text() {
            return Err(SearchAdminError::validation(format!(
                "field '{}' of index '{}' has an analyzer but is not a text field",
                field.name, schema.name
            )));
        }
    }

    let keys: Vec<&str> = schema.key_fields().map(|f| f.name.as_str()).collect();
    match keys.as_slice() {
        [] => {
            return Err(SearchAdminError::validation(format!(
                "index '{}' has no key field",
                schema.name
            )))
        }
        [key] => {
            if schema.field(key).map(|f| f.data_type) != Some(DataType::String) {
                return Err(SearchAdminError::validation(format!(
                    "key field '{}' of index '{}' must be Edm.String",
                    key, schema.name
                )));
            }
        }
        many => {
            return Err(SearchAdminError::validation(format!(
                "index '{}' has {} key fields ({}), exactly one is required",
                schema.name,
                many.len(),
                many.join(", ")
            )))
        }
    }

    if let Some(suggester) = &schema.suggester {
        if suggester.name.is_empty() {
            return Err(SearchAdminError::validation(format!(
                "suggester of index '{}' has no name",
                schema.name
            )));
        }
        if suggester.source_fields.is_empty() {
            return Err(SearchAdminError::validation(format!(
                "suggester '{}' has no source fields",
                suggester.name
            )));
        }
        for source in &suggester.source_fields {
            match schema.field(source) {
                Some(field) if field.data_type.is_text() => {}
                Some(_) => {
                    return Err(SearchAdminError::validation(format!(
                        "suggester '{}' source field '{}' is not a text field",
                        suggester.name, source
                    )))
                }
                None => {
                    return Err(SearchAdminError::validation(format!(
                        "suggester '{}' source field '{}' does not exist in index '{}'",
                        suggester.name, source, schema.name
                    )))
                }
            }
        }
    }

    Ok(())
}

/// Validate a data source registration.
pub fn validate_data_source(config: &DataSourceConfig) -> Result<(), SearchAdminError> {
    validate_resource_name("data source", &config.name)?;

    if config.credentials.connection_string.trim().is_empty() {
        return Err(SearchAdminError::validation(format!(
            "data source '{}' has an empty connection string",
            config.name
        )));
    }
    if config.container.name.trim().is_empty() {
        return Err(SearchAdminError::validation(format!(
            "data source '{}' has no table or container name",
            config.name
        )));
    }

    Ok(())
}

/// Validate an indexer registration.
pub fn validate_indexer(config: &IndexerConfig) -> Result<(), SearchAdminError> {
    validate_resource_name("indexer", &config.name)?;
    validate_resource_name("data source", &config.data_source_name)?;
    validate_resource_name("index", &config.target_index_name)?;

    if let Some(schedule) = &config.schedule {
        if schedule.interval < MIN_SCHEDULE_INTERVAL || schedule.interval > MAX_SCHEDULE_INTERVAL {
            return Err(SearchAdminError::validation(format!(
                "indexer '{}' schedule interval of {}s is outside the allowed range of {}s to {}s",
                config.name,
                schedule.interval.as_secs(),
                MIN_SCHEDULE_INTERVAL.as_secs(),
                MAX_SCHEDULE_INTERVAL.as_secs()
            )));
        }
    }

    for mapping in &config.field_mappings {
        if mapping.source_field_name.is_empty() || mapping.target_field_name.is_empty() {
            return Err(SearchAdminError::validation(format!(
                "indexer '{}' has a field mapping with an empty field name",
                config.name
            )));
        }
    }

    Ok(())
}
