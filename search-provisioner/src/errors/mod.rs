//! Error types for the search provisioner.

use thiserror::Error;

use search_provisioner_repository::SearchAdminError;

/// Errors that can occur during provisioner initialization or execution.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A remote administrative call or local validation failed.
    #[error("Search administration error: {0}")]
    SearchAdmin(#[from] SearchAdminError),

    /// Failed to read from or write to the console.
    #[error("Console error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProvisionError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
