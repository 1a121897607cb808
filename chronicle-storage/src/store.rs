//! The audit store: one primary backend, named archive backends, and the
//! per-entity table registry.

use std::collections::BTreeMap;

use chronicle_core::config::AuditConfig;
use chronicle_core::errors::ChronicleResult;
use chronicle_core::record::{AuditRecord, LogQuery};
use chronicle_core::traits::AuditDriver;

use crate::database::Database;
use crate::queries::record_ops;
use crate::registry::{self, TableRegistry};
use crate::schema;

/// SQLite-backed implementation of [`AuditDriver`].
///
/// Owns the primary backend, any configured archive backends, and the
/// existence cache. Synchronous per call; share behind an `Arc` when a
/// collaborator supplies concurrency.
pub struct AuditStore {
    source: Database,
    archives: BTreeMap<String, Database>,
    registry: TableRegistry,
    auto_migration: bool,
}

impl AuditStore {
    /// Open the primary backend and every configured archive backend.
    pub fn open(config: &AuditConfig) -> ChronicleResult<Self> {
        let source = Database::open_target(&config.driver.connection)?;
        let mut archives = BTreeMap::new();
        for (name, target) in &config.archives {
            archives.insert(name.clone(), Database::open_target(target)?);
        }
        Ok(Self {
            source,
            archives,
            registry: TableRegistry::new(&config.driver, &config.entities),
            auto_migration: config.auto_migration,
        })
    }

    /// The primary backend.
    pub fn source(&self) -> &Database {
        &self.source
    }

    /// A configured archive backend, by name.
    pub fn archive(&self, name: &str) -> Option<&Database> {
        self.archives.get(name)
    }

    /// Physical table name for an entity type (config override or
    /// deterministic derivation).
    pub fn table_name(&self, entity_type: &str) -> String {
        self.registry.table_name(entity_type)
    }
}

impl AuditDriver for AuditStore {
    fn store(&self, record: &AuditRecord) -> ChronicleResult<()> {
        tracing::debug!(
            entity_type = %record.entity_type,
            entity_id = %record.entity_id,
            action = %record.action,
            "storing audit record"
        );

        self.ensure_storage_exists(&record.entity_type)?;
        let table = self.table_name(&record.entity_type);

        self.source
            .with_conn(|conn| record_ops::insert_record(conn, &table, record))
            .map_err(|e| {
                tracing::error!(
                    table = %table,
                    entity_id = %record.entity_id,
                    error = %e,
                    "failed to store audit record"
                );
                e
            })
    }

    fn store_batch(&self, records: &[AuditRecord]) -> ChronicleResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut groups: BTreeMap<&str, Vec<&AuditRecord>> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.entity_type.as_str())
                .or_default()
                .push(record);
        }

        for (entity_type, group) in groups {
            self.ensure_storage_exists(entity_type)?;
            let table = self.table_name(entity_type);
            self.source.with_conn(|conn| {
                for record in group {
                    record_ops::insert_record(conn, &table, record)?;
                }
                Ok(())
            })?;
        }
        Ok(())
    }

    fn ensure_storage_exists(&self, entity_type: &str) -> ChronicleResult<()> {
        let table = self.table_name(entity_type);
        if self.registry.is_known(&table) {
            return Ok(());
        }
        if !self.auto_migration {
            return Ok(());
        }
        if !self.storage_exists_for_entity(entity_type)? {
            self.create_storage_for_entity(entity_type)?;
        }
        Ok(())
    }

    fn storage_exists_for_entity(&self, entity_type: &str) -> ChronicleResult<bool> {
        let table = self.table_name(entity_type);
        if self.registry.is_known(&table) {
            return Ok(true);
        }
        let exists = self
            .source
            .with_conn(|conn| registry::table_exists(conn, &table))?;
        if exists {
            self.registry.mark_known(&table);
        }
        Ok(exists)
    }

    fn create_storage_for_entity(&self, entity_type: &str) -> ChronicleResult<()> {
        let table = self.table_name(entity_type);
        self.source
            .with_conn(|conn| schema::create_audit_table(conn, &table))?;
        self.registry.mark_known(&table);
        tracing::debug!(table = %table, entity_type = %entity_type, "created audit table");
        Ok(())
    }

    fn get_logs_for_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
        query: &LogQuery,
    ) -> ChronicleResult<Vec<AuditRecord>> {
        if !self.storage_exists_for_entity(entity_type)? {
            return Ok(Vec::new());
        }
        let table = self.table_name(entity_type);
        self.source
            .with_conn(|conn| record_ops::query_logs(conn, &table, entity_type, entity_id, query))
    }
}
