/// Configuration and policy-resolution errors.
///
/// These are misconfigurations, not runtime faults: the orchestrator turns
/// them into result-level error strings on multi-entity runs, and only the
/// explicitly-targeted single-entity resolution path lets them propagate.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no retention config found for entity: {entity_type}")]
    EntityNotRegistered { entity_type: String },

    #[error("unknown retention strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("batch_size must be at least 1, got {value}")]
    InvalidBatchSize { value: usize },

    #[error("retention days must be at least 1, got {value}")]
    InvalidDays { value: i64 },

    #[error("archive connection not configured for entity: {entity_type}")]
    ArchiveConnectionMissing { entity_type: String },
}
