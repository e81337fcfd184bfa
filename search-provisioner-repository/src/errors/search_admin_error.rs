//! Search administration error types.
//!
//! This module defines the unified error type for all administrative operations,
//! covering local validation failures, transport failures and unexpected responses
//! from the search service.

use thiserror::Error;

/// Unified errors from administrative operations.
///
/// Used by the capability traits in [`crate::interfaces`] and by every implementation
/// of them.
#[derive(Debug, Clone, Error)]
pub enum SearchAdminError {
    /// A resource definition was rejected before any remote call was made.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to build the client or reach the service endpoint.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The service rejected the admin key.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An index request could not be sent.
    #[error("Index error: {0}")]
    IndexError(String),

    /// A data source request could not be sent.
    #[error("Data source error: {0}")]
    DataSourceError(String),

    /// An indexer request could not be sent.
    #[error("Indexer error: {0}")]
    IndexerError(String),

    /// Failed to serialize a resource definition.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The service answered with a status the operation does not accept.
    #[error("{operation} failed with status {status}: {body}")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        body: String,
    },
}

impl SearchAdminError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an unauthorized error.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a data source error.
    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSourceError(msg.into())
    }

    /// Create an indexer error.
    pub fn indexer(msg: impl Into<String>) -> Self {
        Self::IndexerError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create an unexpected status error.
    pub fn unexpected_status(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }
}
