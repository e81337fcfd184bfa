//! Interface definitions for the search administration client.
//!
//! This module defines the capability traits that allow for dependency injection
//! and swappable backends (the live REST client or an in-memory test double).

mod search_admin_provider;

pub use search_admin_provider::{
    DataSourcesAdmin, IndexersAdmin, IndexesAdmin, SearchAdminProvider,
};
