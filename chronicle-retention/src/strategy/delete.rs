use std::sync::Arc;

use chrono::{DateTime, Utc};

use chronicle_core::errors::ChronicleResult;
use chronicle_core::retention::RetentionPolicy;
use chronicle_core::traits::RetentionStrategy;
use chronicle_storage::queries::retention_ops;
use chronicle_storage::{schema, AuditStore};

use super::AnonymizeStrategy;

/// Physically removes records older than the cutoff, in bounded passes.
///
/// When the policy chains anonymization first, redaction runs before any
/// physical delete, so no unredacted payload survives past
/// `anonymize_after_days` even if the delete phase is interrupted.
pub struct DeleteStrategy {
    store: Arc<AuditStore>,
}

impl DeleteStrategy {
    pub fn new(store: Arc<AuditStore>) -> Self {
        Self { store }
    }
}

impl RetentionStrategy for DeleteStrategy {
    fn name(&self) -> &'static str {
        "delete"
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
        if policy.should_anonymize_first() {
            let anonymize = AnonymizeStrategy::new(Arc::clone(&self.store));
            anonymize.execute_at(entity_type, &policy.anonymize_sub_policy(), now)?;
        }

        let cutoff = schema::format_timestamp(&policy.cutoff_from(now));
        let mut total_deleted = 0;

        loop {
            let deleted = self.store.source().with_conn(|conn| {
                retention_ops::delete_batch(conn, &policy.table_name, &cutoff, policy.batch_size)
            })?;
            total_deleted += deleted;

            // A short pass means the qualifying set is drained.
            if deleted < policy.batch_size {
                break;
            }
        }

        tracing::debug!(
            entity_type = %entity_type,
            table = %policy.table_name,
            deleted = total_deleted,
            "delete retention pass complete"
        );
        Ok(total_deleted)
    }
}
