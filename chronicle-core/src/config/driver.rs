use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Where a backend's database lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionTarget {
    /// File-backed SQLite database.
    File(PathBuf),
    /// In-memory database (tests, ephemeral runs).
    Memory,
}

impl Default for ConnectionTarget {
    fn default() -> Self {
        Self::Memory
    }
}

/// Primary storage backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Primary backend location.
    pub connection: ConnectionTarget,
    /// Prefix for derived table names.
    pub table_prefix: String,
    /// Suffix for derived table names.
    pub table_suffix: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionTarget::default(),
            table_prefix: defaults::DEFAULT_TABLE_PREFIX.to_string(),
            table_suffix: defaults::DEFAULT_TABLE_SUFFIX.to_string(),
        }
    }
}
