use crate::errors::ChronicleResult;
use crate::record::{AuditRecord, LogQuery};

/// Durable write/read of audit records against one physical backend, with
/// on-demand schema provisioning.
///
/// Provisioning and write errors surface to the caller; retry policy is a
/// collaborator concern (an outer queue, a scheduler).
pub trait AuditDriver {
    /// Ensure storage exists for the record's entity type, then insert one
    /// row. May create a storage unit as a side effect.
    fn store(&self, record: &AuditRecord) -> ChronicleResult<()>;

    /// Group records by entity type, ensure storage once per group, then
    /// write sequentially. Best-effort: a failure does not roll back rows
    /// already written.
    fn store_batch(&self, records: &[AuditRecord]) -> ChronicleResult<()>;

    /// No-op when the existence cache is warm or auto-provisioning is
    /// disabled; otherwise create and mark cached.
    fn ensure_storage_exists(&self, entity_type: &str) -> ChronicleResult<()>;

    /// Cache-first existence check; a miss queries the backend and
    /// populates the cache.
    fn storage_exists_for_entity(&self, entity_type: &str) -> ChronicleResult<bool>;

    /// Create the storage unit with the fixed audit schema and indexes.
    /// Idempotent.
    fn create_storage_for_entity(&self, entity_type: &str) -> ChronicleResult<()>;

    /// Read an entity instance's audit trail. Missing storage yields an
    /// empty list, not an error.
    fn get_logs_for_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
        query: &LogQuery,
    ) -> ChronicleResult<Vec<AuditRecord>>;
}
