/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("failed to create table {table}: {reason}")]
    TableCreation { table: String, reason: String },

    #[error("failed to serialize payload: {reason}")]
    Serialization { reason: String },

    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },
}
