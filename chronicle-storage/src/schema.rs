//! Audit table DDL and timestamp canonicalization.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use chronicle_core::errors::{ChronicleResult, StorageError};

/// Fixed-width UTC text format. Same-format strings compare
/// lexicographically in chronological order, which the strict
/// `created_at < cutoff` comparisons rely on.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Canonical text form of a timestamp for storage and comparison.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp back into a `DateTime<Utc>`.
pub fn parse_timestamp(value: &str) -> ChronicleResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| {
            StorageError::InvalidTimestamp {
                value: value.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
}

/// Create a per-entity audit table with the fixed schema and the indexes
/// the lookup and retention query patterns need. Idempotent.
pub fn create_audit_table(conn: &Connection, table: &str) -> ChronicleResult<()> {
    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS {table} (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            entity_id     TEXT NOT NULL,
            action        TEXT NOT NULL,
            old_values    TEXT,
            new_values    TEXT,
            causer_type   TEXT,
            causer_id     TEXT,
            metadata      TEXT NOT NULL DEFAULT '{{}}',
            created_at    TEXT NOT NULL,
            source        TEXT,
            anonymized_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_entity_id ON {table}(entity_id);
        CREATE INDEX IF NOT EXISTS idx_{table}_causer_id ON {table}(causer_id);
        CREATE INDEX IF NOT EXISTS idx_{table}_created_at ON {table}(created_at);
        CREATE INDEX IF NOT EXISTS idx_{table}_action ON {table}(action);
        CREATE INDEX IF NOT EXISTS idx_{table}_entity_action ON {table}(entity_id, action);
        CREATE INDEX IF NOT EXISTS idx_{table}_entity_created ON {table}(entity_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_{table}_causer_action ON {table}(causer_id, action);
        CREATE INDEX IF NOT EXISTS idx_{table}_action_created ON {table}(action, created_at);
        ",
    ))
    .map_err(|e| {
        StorageError::TableCreation {
            table: table.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Create the archive twin of an audit table: same columns plus
/// `archived_at`, stamped at copy time. The copied `id` is not a primary
/// key: the copy-then-delete loop may legitimately insert the same source
/// row twice after a crash between the two steps.
pub fn create_archive_table(conn: &Connection, table: &str) -> ChronicleResult<()> {
    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS {table} (
            id            INTEGER NOT NULL,
            entity_id     TEXT NOT NULL,
            action        TEXT NOT NULL,
            old_values    TEXT,
            new_values    TEXT,
            causer_type   TEXT,
            causer_id     TEXT,
            metadata      TEXT NOT NULL DEFAULT '{{}}',
            created_at    TEXT NOT NULL,
            source        TEXT,
            anonymized_at TEXT,
            archived_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_entity_id ON {table}(entity_id);
        CREATE INDEX IF NOT EXISTS idx_{table}_causer_id ON {table}(causer_id);
        CREATE INDEX IF NOT EXISTS idx_{table}_created_at ON {table}(created_at);
        CREATE INDEX IF NOT EXISTS idx_{table}_action ON {table}(action);
        CREATE INDEX IF NOT EXISTS idx_{table}_archived_at ON {table}(archived_at);
        ",
    ))
    .map_err(|e| {
        StorageError::TableCreation {
            table: table.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
