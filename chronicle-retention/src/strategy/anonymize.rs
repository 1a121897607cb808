use std::sync::Arc;

use chrono::{DateTime, Utc};

use chronicle_core::errors::ChronicleResult;
use chronicle_core::retention::RetentionPolicy;
use chronicle_core::traits::RetentionStrategy;
use chronicle_storage::queries::retention_ops;
use chronicle_storage::{schema, AuditStore};

use crate::redaction;

/// Redacts sensitive payload fields in place of deleting the records.
///
/// Selection is guarded by `anonymized_at IS NULL`, so a row is processed
/// at most once no matter how many passes or runs see it.
pub struct AnonymizeStrategy {
    store: Arc<AuditStore>,
}

impl AnonymizeStrategy {
    pub fn new(store: Arc<AuditStore>) -> Self {
        Self { store }
    }
}

impl RetentionStrategy for AnonymizeStrategy {
    fn name(&self) -> &'static str {
        "anonymize"
    }

    fn can_execute(&self, _policy: &RetentionPolicy) -> bool {
        true
    }

    fn execute_at(
        &self,
        entity_type: &str,
        policy: &RetentionPolicy,
        now: DateTime<Utc>,
    ) -> ChronicleResult<usize> {
        let cutoff = schema::format_timestamp(&policy.cutoff_from(now));
        let stamped_at = schema::format_timestamp(&now);
        let mut total_anonymized = 0;

        loop {
            let candidates = self.store.source().with_conn(|conn| {
                retention_ops::select_anonymize_batch(
                    conn,
                    &policy.table_name,
                    &cutoff,
                    policy.batch_size,
                )
            })?;
            if candidates.is_empty() {
                break;
            }

            let count = candidates.len();
            self.store.source().with_conn(|conn| {
                for candidate in &candidates {
                    let old_values = candidate
                        .old_values
                        .as_deref()
                        .map(redaction::redact_serialized);
                    let new_values = candidate
                        .new_values
                        .as_deref()
                        .map(redaction::redact_serialized);
                    let metadata = redaction::redact_serialized(&candidate.metadata);

                    retention_ops::apply_anonymization(
                        conn,
                        &policy.table_name,
                        candidate.id,
                        old_values.as_deref(),
                        new_values.as_deref(),
                        &metadata,
                        &stamped_at,
                    )?;
                }
                Ok(())
            })?;

            total_anonymized += count;
            if count < policy.batch_size {
                break;
            }
        }

        tracing::debug!(
            entity_type = %entity_type,
            table = %policy.table_name,
            anonymized = total_anonymized,
            "anonymize retention pass complete"
        );
        Ok(total_anonymized)
    }
}
