//! Error taxonomy: configuration vs storage, plus the crate-wide umbrella.

mod config_error;
mod storage_error;

pub use config_error::ConfigError;
pub use storage_error::StorageError;

/// Crate-wide result alias.
pub type ChronicleResult<T> = Result<T, ChronicleError>;

/// Umbrella error for all Chronicle subsystems.
#[derive(Debug, thiserror::Error)]
pub enum ChronicleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
