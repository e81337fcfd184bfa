//! Error types for the search provisioner repository.
//!
//! This module provides a unified error type for all administrative operations.

mod search_admin_error;

pub use search_admin_error::SearchAdminError;
