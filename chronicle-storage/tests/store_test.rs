//! Integration tests: on-demand provisioning, writes, reads, and the
//! existence cache.

use chrono::{DateTime, Duration, Utc};
use chronicle_core::config::{AuditConfig, ConnectionTarget};
use chronicle_core::errors::{ChronicleError, StorageError};
use chronicle_core::record::{action, AuditRecord, LogQuery, SortOrder};
use chronicle_core::traits::AuditDriver;
use chronicle_storage::{schema, AuditStore};
use serde_json::json;

fn sql_err(e: impl std::fmt::Display) -> ChronicleError {
    StorageError::Sqlite {
        message: e.to_string(),
    }
    .into()
}

/// Now, truncated to the stored millisecond precision so records
/// round-trip exactly.
fn now_ms() -> DateTime<Utc> {
    schema::parse_timestamp(&schema::format_timestamp(&Utc::now())).unwrap()
}

fn make_record(entity_id: &str, action: &str, at: DateTime<Utc>) -> AuditRecord {
    AuditRecord::builder("User", entity_id)
        .action(action)
        .from(json!({ "email": "old@example.com" }))
        .to(json!({ "email": "new@example.com" }))
        .causer("User", "admin-1")
        .metadata(json!({ "ip_address": "10.0.0.1" }))
        .created_at(at)
        .source("test")
        .build()
}

#[test]
fn store_creates_table_on_demand_and_round_trips() {
    let store = AuditStore::open(&AuditConfig::default()).unwrap();
    assert!(!store.storage_exists_for_entity("User").unwrap());

    let record = make_record("42", action::UPDATED, now_ms());
    store.store(&record).unwrap();

    assert!(store.storage_exists_for_entity("User").unwrap());
    let logs = store
        .get_logs_for_entity("User", "42", &LogQuery::default())
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0], record);
}

#[test]
fn auto_migration_disabled_never_provisions() {
    let config = AuditConfig {
        auto_migration: false,
        ..Default::default()
    };
    let store = AuditStore::open(&config).unwrap();

    let record = make_record("1", action::CREATED, now_ms());
    let err = store.store(&record).unwrap_err();
    assert!(matches!(
        err,
        ChronicleError::Storage(StorageError::Sqlite { .. })
    ));
    assert!(!store.storage_exists_for_entity("User").unwrap());
}

#[test]
fn get_logs_for_missing_table_is_empty_not_an_error() {
    let store = AuditStore::open(&AuditConfig::default()).unwrap();
    let logs = store
        .get_logs_for_entity("Ghost", "1", &LogQuery::default())
        .unwrap();
    assert!(logs.is_empty());
}

#[test]
fn get_logs_filters_by_action_and_entity_id() {
    let store = AuditStore::open(&AuditConfig::default()).unwrap();
    let at = now_ms();
    store.store(&make_record("1", action::CREATED, at)).unwrap();
    store.store(&make_record("1", action::UPDATED, at)).unwrap();
    store.store(&make_record("2", action::UPDATED, at)).unwrap();

    let query = LogQuery {
        action: Some(action::UPDATED.to_string()),
        ..Default::default()
    };
    let logs = store.get_logs_for_entity("User", "1", &query).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "updated");
    assert_eq!(logs[0].entity_id, "1");
}

#[test]
fn get_logs_date_range_is_inclusive() {
    let store = AuditStore::open(&AuditConfig::default()).unwrap();
    let base = now_ms();
    let t1 = base - Duration::hours(3);
    let t2 = base - Duration::hours(2);
    let t3 = base - Duration::hours(1);
    for at in [t1, t2, t3] {
        store.store(&make_record("1", action::UPDATED, at)).unwrap();
    }

    let from_t2 = LogQuery {
        from_date: Some(t2),
        sort: SortOrder::Asc,
        ..Default::default()
    };
    let logs = store.get_logs_for_entity("User", "1", &from_t2).unwrap();
    assert_eq!(
        logs.iter().map(|l| l.created_at).collect::<Vec<_>>(),
        vec![t2, t3]
    );

    let to_t2 = LogQuery {
        to_date: Some(t2),
        sort: SortOrder::Asc,
        ..Default::default()
    };
    let logs = store.get_logs_for_entity("User", "1", &to_t2).unwrap();
    assert_eq!(
        logs.iter().map(|l| l.created_at).collect::<Vec<_>>(),
        vec![t1, t2]
    );
}

#[test]
fn get_logs_sorts_and_paginates() {
    let store = AuditStore::open(&AuditConfig::default()).unwrap();
    let base = now_ms();
    for hours_ago in 1..=5 {
        store
            .store(&make_record(
                "1",
                action::UPDATED,
                base - Duration::hours(hours_ago),
            ))
            .unwrap();
    }

    // Default sort: newest first.
    let logs = store
        .get_logs_for_entity("User", "1", &LogQuery::default())
        .unwrap();
    assert_eq!(logs[0].created_at, base - Duration::hours(1));
    assert_eq!(logs[4].created_at, base - Duration::hours(5));

    let page = LogQuery {
        sort: SortOrder::Asc,
        limit: Some(2),
        offset: Some(2),
        ..Default::default()
    };
    let logs = store.get_logs_for_entity("User", "1", &page).unwrap();
    assert_eq!(
        logs.iter().map(|l| l.created_at).collect::<Vec<_>>(),
        vec![base - Duration::hours(3), base - Duration::hours(2)]
    );
}

#[test]
fn store_batch_groups_by_entity_type() {
    let store = AuditStore::open(&AuditConfig::default()).unwrap();
    let at = now_ms();
    let records = vec![
        make_record("1", action::CREATED, at),
        AuditRecord::builder("Post", "9")
            .action(action::CREATED)
            .to(json!({ "title": "hello" }))
            .created_at(at)
            .build(),
        make_record("2", action::CREATED, at),
    ];
    store.store_batch(&records).unwrap();

    assert!(store.storage_exists_for_entity("User").unwrap());
    assert!(store.storage_exists_for_entity("Post").unwrap());
    assert_eq!(
        store
            .get_logs_for_entity("User", "1", &LogQuery::default())
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        store
            .get_logs_for_entity("Post", "9", &LogQuery::default())
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn existence_cache_lives_as_long_as_the_driver() {
    let store = AuditStore::open(&AuditConfig::default()).unwrap();
    store.create_storage_for_entity("User").unwrap();
    assert!(store.storage_exists_for_entity("User").unwrap());

    // Pull the table out from under the cache; the driver instance still
    // answers from its process-local cache.
    store
        .source()
        .with_conn(|conn| {
            conn.execute("DROP TABLE audit_users_logs", [])
                .map(|_| ())
                .map_err(sql_err)
        })
        .unwrap();
    assert!(store.storage_exists_for_entity("User").unwrap());
}

#[test]
fn create_storage_is_idempotent() {
    let store = AuditStore::open(&AuditConfig::default()).unwrap();
    store.create_storage_for_entity("User").unwrap();
    store.create_storage_for_entity("User").unwrap();
    assert!(store.storage_exists_for_entity("User").unwrap());
}

#[test]
fn audit_table_carries_lookup_and_retention_indexes() {
    let store = AuditStore::open(&AuditConfig::default()).unwrap();
    store.create_storage_for_entity("User").unwrap();

    let index_count: i64 = store
        .source()
        .with_conn(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'index' AND tbl_name = 'audit_users_logs'
                   AND name LIKE 'idx_%'",
                [],
                |row| row.get(0),
            )
            .map_err(sql_err)
        })
        .unwrap();
    assert_eq!(index_count, 8);
}

#[test]
fn file_backed_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.db");
    let config = AuditConfig {
        driver: chronicle_core::config::DriverConfig {
            connection: ConnectionTarget::File(path.clone()),
            ..Default::default()
        },
        ..Default::default()
    };

    let record = make_record("42", action::CREATED, now_ms());
    {
        let store = AuditStore::open(&config).unwrap();
        store.store(&record).unwrap();
    }

    let store = AuditStore::open(&config).unwrap();
    let logs = store
        .get_logs_for_entity("User", "42", &LogQuery::default())
        .unwrap();
    assert_eq!(logs, vec![record]);
}
