//! Default values shared by the config structs.

/// Prefix prepended to derived audit table names.
pub const DEFAULT_TABLE_PREFIX: &str = "audit_";

/// Suffix appended to derived audit table names.
pub const DEFAULT_TABLE_SUFFIX: &str = "_logs";

/// Schema creation on first use is on unless disabled.
pub const DEFAULT_AUTO_MIGRATION: bool = true;

/// Retention is opt-in.
pub const DEFAULT_RETENTION_ENABLED: bool = false;

/// Age threshold for the primary strategy (days).
pub const DEFAULT_RETENTION_DAYS: i64 = 365;

/// Primary strategy tag.
pub const DEFAULT_RETENTION_STRATEGY: &str = "delete";

/// Records per batch pass.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Secondary threshold for the anonymize-before-delete chain (days).
pub const DEFAULT_ANONYMIZE_AFTER_DAYS: i64 = 180;
