use serde::{Deserialize, Serialize};

use super::defaults;

/// Global retention defaults. The strategy is kept as its string tag here;
/// it is parsed and validated when a [`crate::RetentionPolicy`] is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionSettings {
    /// Master switch for the retention engine.
    pub enabled: bool,
    /// Age threshold for the primary strategy (days).
    pub days: i64,
    /// Strategy tag: delete | archive | anonymize.
    pub strategy: String,
    /// Records per batch pass.
    pub batch_size: usize,
    /// Secondary threshold for the anonymize-before-delete chain (days).
    /// Only meaningful when less than `days`.
    pub anonymize_after_days: i64,
    /// Named archive backend; required by the archive strategy.
    pub archive_connection: Option<String>,
    /// Hint for schedulers; the core never schedules itself.
    pub run_cleanup_automatically: bool,
}

impl Default for RetentionSettings {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_RETENTION_ENABLED,
            days: defaults::DEFAULT_RETENTION_DAYS,
            strategy: defaults::DEFAULT_RETENTION_STRATEGY.to_string(),
            batch_size: defaults::DEFAULT_BATCH_SIZE,
            anonymize_after_days: defaults::DEFAULT_ANONYMIZE_AFTER_DAYS,
            archive_connection: None,
            run_cleanup_automatically: false,
        }
    }
}

/// Per-entity retention override. Every field is optional; an absent field
/// keeps the global value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionOverride {
    pub enabled: Option<bool>,
    pub days: Option<i64>,
    pub strategy: Option<String>,
    pub batch_size: Option<usize>,
    pub anonymize_after_days: Option<i64>,
    pub archive_connection: Option<String>,
}

impl RetentionOverride {
    /// Merge onto the global settings, field-by-field; the override wins.
    pub fn apply_to(&self, base: &RetentionSettings) -> RetentionSettings {
        RetentionSettings {
            enabled: self.enabled.unwrap_or(base.enabled),
            days: self.days.unwrap_or(base.days),
            strategy: self.strategy.clone().unwrap_or_else(|| base.strategy.clone()),
            batch_size: self.batch_size.unwrap_or(base.batch_size),
            anonymize_after_days: self
                .anonymize_after_days
                .unwrap_or(base.anonymize_after_days),
            archive_connection: self
                .archive_connection
                .clone()
                .or_else(|| base.archive_connection.clone()),
            run_cleanup_automatically: base.run_cleanup_automatically,
        }
    }
}
