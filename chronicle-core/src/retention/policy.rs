use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RetentionSettings;
use crate::errors::ConfigError;

/// The closed set of cleanup strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Delete,
    Archive,
    Anonymize,
}

impl StrategyKind {
    /// Parse a config tag. Unknown tags are a configuration error, caught
    /// at policy-resolution time.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name {
            "delete" => Ok(Self::Delete),
            "archive" => Ok(Self::Archive),
            "anonymize" => Ok(Self::Anonymize),
            other => Err(ConfigError::UnknownStrategy {
                name: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Archive => "archive",
            Self::Anonymize => "anonymize",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved, validated retention policy for one entity.
///
/// Built by merging the global retention settings with the entity's
/// override and binding the physical table name. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub enabled: bool,
    /// Age threshold for the primary strategy (days).
    pub days: i64,
    pub strategy: StrategyKind,
    /// Records per batch pass. Always at least 1.
    pub batch_size: usize,
    /// Secondary threshold for the anonymize-before-delete chain (days).
    pub anonymize_after_days: i64,
    pub archive_connection: Option<String>,
    pub entity_type: String,
    pub table_name: String,
}

impl RetentionPolicy {
    /// Resolve merged settings into a validated policy.
    ///
    /// A zero or negative `days` or `batch_size` is a misconfiguration (a
    /// zero batch would loop forever) and is rejected, never clamped.
    pub fn from_settings(
        settings: &RetentionSettings,
        entity_type: &str,
        table_name: &str,
    ) -> Result<Self, ConfigError> {
        let strategy = StrategyKind::parse(&settings.strategy)?;

        if settings.days < 1 {
            return Err(ConfigError::InvalidDays {
                value: settings.days,
            });
        }
        if settings.batch_size < 1 {
            return Err(ConfigError::InvalidBatchSize {
                value: settings.batch_size,
            });
        }

        Ok(Self {
            enabled: settings.enabled,
            days: settings.days,
            strategy,
            batch_size: settings.batch_size,
            anonymize_after_days: settings.anonymize_after_days,
            archive_connection: settings.archive_connection.clone(),
            entity_type: entity_type.to_string(),
            table_name: table_name.to_string(),
        })
    }

    /// Whether the delete strategy must run an anonymize pass first, so no
    /// unredacted payload outlives `anonymize_after_days` even when the
    /// physical delete is further out.
    pub fn should_anonymize_first(&self) -> bool {
        self.anonymize_after_days > 0 && self.anonymize_after_days < self.days
    }

    /// The timestamp boundary below which records qualify, relative to a
    /// reference time. Comparison is strict: a record created exactly at
    /// the cutoff instant is retained.
    pub fn cutoff_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days)
    }

    /// Derived policy for the anonymize-before-delete chain: same table,
    /// same batching, but thresholded at `anonymize_after_days`.
    pub fn anonymize_sub_policy(&self) -> Self {
        Self {
            enabled: true,
            days: self.anonymize_after_days,
            strategy: StrategyKind::Anonymize,
            ..self.clone()
        }
    }
}
