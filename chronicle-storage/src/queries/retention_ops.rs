//! Batch primitives behind the retention strategies.
//!
//! Every operation here is bounded by a batch size and re-filters by
//! primary key where it mutates, so a row whose state changes between a
//! select and the corresponding write is never acted on by a stale
//! predicate.

use rusqlite::{params, params_from_iter, Connection};

use chronicle_core::errors::ChronicleResult;

use crate::to_storage_err;

/// Delete up to `batch_size` rows older than the cutoff. Returns the
/// number actually deleted; a short count means the backlog is drained.
pub fn delete_batch(
    conn: &Connection,
    table: &str,
    cutoff: &str,
    batch_size: usize,
) -> ChronicleResult<usize> {
    conn.execute(
        &format!(
            "DELETE FROM {table} WHERE id IN (
                SELECT id FROM {table} WHERE created_at < ?1 LIMIT {batch_size}
            )"
        ),
        params![cutoff],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// A row selected for anonymization: just the id and the serialized
/// payload columns that redaction rewrites.
pub struct AnonymizeCandidate {
    pub id: i64,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub metadata: String,
}

/// Select up to `batch_size` not-yet-anonymized rows older than the
/// cutoff. The `anonymized_at IS NULL` guard keeps repeat passes from
/// ever reprocessing a row.
pub fn select_anonymize_batch(
    conn: &Connection,
    table: &str,
    cutoff: &str,
    batch_size: usize,
) -> ChronicleResult<Vec<AnonymizeCandidate>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT id, old_values, new_values, metadata
             FROM {table}
             WHERE created_at < ?1 AND anonymized_at IS NULL
             ORDER BY id
             LIMIT {batch_size}"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mapped = stmt
        .query_map(params![cutoff], |row| {
            Ok(AnonymizeCandidate {
                id: row.get(0)?,
                old_values: row.get(1)?,
                new_values: row.get(2)?,
                metadata: row.get(3)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    mapped
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Write a redacted row back: payloads replaced, causer cleared, and the
/// anonymized marker set. Keyed by id, not by the original predicate.
pub fn apply_anonymization(
    conn: &Connection,
    table: &str,
    id: i64,
    old_values: Option<&str>,
    new_values: Option<&str>,
    metadata: &str,
    anonymized_at: &str,
) -> ChronicleResult<()> {
    conn.execute(
        &format!(
            "UPDATE {table}
             SET old_values = ?1, new_values = ?2, metadata = ?3,
                 causer_type = NULL, causer_id = NULL, anonymized_at = ?4
             WHERE id = ?5"
        ),
        params![old_values, new_values, metadata, anonymized_at, id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// A full source row headed for the archive backend.
pub struct ArchiveRow {
    pub id: i64,
    pub entity_id: String,
    pub action: String,
    pub old_values: Option<String>,
    pub new_values: Option<String>,
    pub causer_type: Option<String>,
    pub causer_id: Option<String>,
    pub metadata: String,
    pub created_at: String,
    pub source: Option<String>,
    pub anonymized_at: Option<String>,
}

/// Select up to `batch_size` full rows older than the cutoff.
pub fn select_archive_batch(
    conn: &Connection,
    table: &str,
    cutoff: &str,
    batch_size: usize,
) -> ChronicleResult<Vec<ArchiveRow>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT id, entity_id, action, old_values, new_values,
                    causer_type, causer_id, metadata, created_at, source, anonymized_at
             FROM {table}
             WHERE created_at < ?1
             ORDER BY id
             LIMIT {batch_size}"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mapped = stmt
        .query_map(params![cutoff], |row| {
            Ok(ArchiveRow {
                id: row.get(0)?,
                entity_id: row.get(1)?,
                action: row.get(2)?,
                old_values: row.get(3)?,
                new_values: row.get(4)?,
                causer_type: row.get(5)?,
                causer_id: row.get(6)?,
                metadata: row.get(7)?,
                created_at: row.get(8)?,
                source: row.get(9)?,
                anonymized_at: row.get(10)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    mapped
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Copy rows into the archive table as-is, stamping `archived_at`.
/// One transaction per batch.
pub fn insert_archive_rows(
    conn: &Connection,
    table: &str,
    rows: &[ArchiveRow],
    archived_at: &str,
) -> ChronicleResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| to_storage_err(e.to_string()))?;

    for row in rows {
        let result = conn.execute(
            &format!(
                "INSERT INTO {table} (
                    id, entity_id, action, old_values, new_values,
                    causer_type, causer_id, metadata, created_at, source,
                    anonymized_at, archived_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
            ),
            params![
                row.id,
                row.entity_id,
                row.action,
                row.old_values,
                row.new_values,
                row.causer_type,
                row.causer_id,
                row.metadata,
                row.created_at,
                row.source,
                row.anonymized_at,
                archived_at,
            ],
        );
        if let Err(e) = result {
            let _ = conn.execute_batch("ROLLBACK");
            return Err(to_storage_err(e.to_string()));
        }
    }

    conn.execute_batch("COMMIT")
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Delete exactly the given row ids from the source table.
pub fn delete_by_ids(conn: &Connection, table: &str, ids: &[i64]) -> ChronicleResult<usize> {
    if ids.is_empty() {
        return Ok(0);
    }
    let placeholders = (1..=ids.len())
        .map(|n| format!("?{n}"))
        .collect::<Vec<_>>()
        .join(", ");
    conn.execute(
        &format!("DELETE FROM {table} WHERE id IN ({placeholders})"),
        params_from_iter(ids.iter()),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
