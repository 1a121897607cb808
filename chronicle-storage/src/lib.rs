//! SQLite persistence for audit records: connection handling, on-demand
//! schema provisioning, record read/write, and the batch primitives the
//! retention engine drives.

pub mod database;
pub mod queries;
pub mod registry;
pub mod schema;
pub mod store;

pub use database::Database;
pub use registry::TableRegistry;
pub use store::AuditStore;

use chronicle_core::errors::{ChronicleError, StorageError};

/// Map an underlying SQLite failure into the crate error type.
pub(crate) fn to_storage_err(message: impl Into<String>) -> ChronicleError {
    StorageError::Sqlite {
        message: message.into(),
    }
    .into()
}
