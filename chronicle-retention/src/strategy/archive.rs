use std::sync::Arc;

use chrono::{DateTime, Utc};

use chronicle_core::errors::{ChronicleResult, ConfigError};
use chronicle_core::retention::RetentionPolicy;
use chronicle_core::traits::RetentionStrategy;
use chronicle_storage::database::Database;
use chronicle_storage::queries::retention_ops;
use chronicle_storage::{schema, AuditStore};

/// Moves records older than the cutoff onto a secondary backend.
///
/// Copy-then-delete, not a move: a crash between the archive insert and
/// the source delete leaves a duplicate on the next run, never a lost
/// record.
pub struct ArchiveStrategy {
    store: Arc<AuditStore>,
}

impl ArchiveStrategy {
    pub fn new(store: Arc<AuditStore>) -> Self {
        Self { store }
    }

    fn archive_backend(&self, policy: &RetentionPolicy) -> ChronicleResult<&Database> {
        policy
            .archive_connection
            .as_deref()
            .filter(|name| !name.is_empty())
            .and_then(|name| self.store.archive(name))
            .ok_or_else(|| {
                ConfigError::ArchiveConnectionMissing {
                    entity_type: policy.entity_type.clone(),
                }
                .into()
            })
    }

    fn archive_table(policy: &RetentionPolicy) -> String {
        format!("{}_archive", policy.table_name)
    }
}

impl RetentionStrategy for ArchiveStrategy {
    fn name(&self) -> &'static str {
        "archive"
    }

    fn can_execute(&self, policy: &RetentionPolicy) -> bool {
        policy
            .archive_connection
            .as_deref()
            .is_some_and(|name| !name.is_empty() && self.store.archive(name).is_some())
    }

    fn execute_at(
        &self,
        entity_type: &str,
        policy: &RetentionPolicy,
        now: DateTime<Utc>,
    ) -> ChronicleResult<usize> {
        // Fatal, not retried: running without a configured archive backend
        // is a misconfiguration.
        let archive_db = self.archive_backend(policy)?;
        let archive_table = Self::archive_table(policy);

        archive_db.with_conn(|conn| schema::create_archive_table(conn, &archive_table))?;

        let cutoff = schema::format_timestamp(&policy.cutoff_from(now));
        let archived_at = schema::format_timestamp(&now);
        let mut total_archived = 0;

        loop {
            let rows = self.store.source().with_conn(|conn| {
                retention_ops::select_archive_batch(
                    conn,
                    &policy.table_name,
                    &cutoff,
                    policy.batch_size,
                )
            })?;
            if rows.is_empty() {
                break;
            }

            archive_db.with_conn(|conn| {
                retention_ops::insert_archive_rows(conn, &archive_table, &rows, &archived_at)
            })?;

            // Delete exactly the copied ids, not the original predicate.
            let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
            self.store.source().with_conn(|conn| {
                retention_ops::delete_by_ids(conn, &policy.table_name, &ids)
            })?;

            let count = rows.len();
            total_archived += count;
            if count < policy.batch_size {
                break;
            }
        }

        tracing::debug!(
            entity_type = %entity_type,
            table = %policy.table_name,
            archive_table = %archive_table,
            archived = total_archived,
            "archive retention pass complete"
        );
        Ok(total_archived)
    }
}
