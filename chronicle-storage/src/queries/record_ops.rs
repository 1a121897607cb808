//! Insert and read operations for audit records.

use rusqlite::{params, params_from_iter, Connection};
use serde_json::Value;

use chronicle_core::errors::{ChronicleResult, StorageError};
use chronicle_core::record::{AuditRecord, LogQuery};

use crate::schema::{format_timestamp, parse_timestamp};
use crate::to_storage_err;

/// Insert one record into its entity's table.
pub fn insert_record(conn: &Connection, table: &str, record: &AuditRecord) -> ChronicleResult<()> {
    let old_values = serialize_optional(record.old_values.as_ref())?;
    let new_values = serialize_optional(record.new_values.as_ref())?;
    let metadata = serialize_value(&record.metadata)?;

    conn.execute(
        &format!(
            "INSERT INTO {table} (
                entity_id, action, old_values, new_values,
                causer_type, causer_id, metadata, created_at, source
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        params![
            record.entity_id,
            record.action,
            old_values,
            new_values,
            record.causer_type,
            record.causer_id,
            metadata,
            format_timestamp(&record.created_at),
            record.source,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Read an entity instance's trail with the query's filters applied.
pub fn query_logs(
    conn: &Connection,
    table: &str,
    entity_type: &str,
    entity_id: &str,
    query: &LogQuery,
) -> ChronicleResult<Vec<AuditRecord>> {
    let mut sql = format!(
        "SELECT entity_id, action, old_values, new_values,
                causer_type, causer_id, metadata, created_at, source
         FROM {table} WHERE entity_id = ?1"
    );
    let mut args: Vec<String> = vec![entity_id.to_string()];

    if let Some(action) = &query.action {
        args.push(action.clone());
        sql.push_str(&format!(" AND action = ?{}", args.len()));
    }
    if let Some(from) = &query.from_date {
        args.push(format_timestamp(from));
        sql.push_str(&format!(" AND created_at >= ?{}", args.len()));
    }
    if let Some(to) = &query.to_date {
        args.push(format_timestamp(to));
        sql.push_str(&format!(" AND created_at <= ?{}", args.len()));
    }

    sql.push_str(&format!(" ORDER BY created_at {}", query.sort.as_sql()));

    // LIMIT is required before OFFSET in SQLite; -1 means unbounded.
    match (query.limit, query.offset) {
        (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
        (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
        (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
        (None, None) => {}
    }

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let raw_rows = stmt
        .query_map(params_from_iter(args.iter()), |row| {
            Ok(RawRow {
                entity_id: row.get(0)?,
                action: row.get(1)?,
                old_values: row.get(2)?,
                new_values: row.get(3)?,
                causer_type: row.get(4)?,
                causer_id: row.get(5)?,
                metadata: row.get(6)?,
                created_at: row.get(7)?,
                source: row.get(8)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?;

    raw_rows
        .into_iter()
        .map(|raw| raw.into_record(entity_type))
        .collect()
}

struct RawRow {
    entity_id: String,
    action: String,
    old_values: Option<String>,
    new_values: Option<String>,
    causer_type: Option<String>,
    causer_id: Option<String>,
    metadata: String,
    created_at: String,
    source: Option<String>,
}

impl RawRow {
    fn into_record(self, entity_type: &str) -> ChronicleResult<AuditRecord> {
        Ok(AuditRecord {
            entity_type: entity_type.to_string(),
            entity_id: self.entity_id,
            action: self.action,
            old_values: deserialize_optional(self.old_values.as_deref())?,
            new_values: deserialize_optional(self.new_values.as_deref())?,
            causer_type: self.causer_type,
            causer_id: self.causer_id,
            metadata: serde_json::from_str(&self.metadata)
                .unwrap_or_else(|_| Value::Object(Default::default())),
            created_at: parse_timestamp(&self.created_at)?,
            source: self.source,
        })
    }
}

fn serialize_value(value: &Value) -> ChronicleResult<String> {
    serde_json::to_string(value).map_err(|e| {
        StorageError::Serialization {
            reason: e.to_string(),
        }
        .into()
    })
}

fn serialize_optional(value: Option<&Value>) -> ChronicleResult<Option<String>> {
    value.map(serialize_value).transpose()
}

fn deserialize_optional(text: Option<&str>) -> ChronicleResult<Option<Value>> {
    text.map(|t| {
        serde_json::from_str(t).map_err(|e| {
            StorageError::Serialization {
                reason: e.to_string(),
            }
            .into()
        })
    })
    .transpose()
}
