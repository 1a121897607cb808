//! Entity-type to physical table mapping with a process-local existence
//! cache.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use rusqlite::Connection;

use chronicle_core::config::{DriverConfig, EntityConfig};
use chronicle_core::errors::ChronicleResult;

use crate::to_storage_err;

/// Maps entity types to physical table names and remembers which tables
/// are known to exist, so repeated writes don't re-query the backend.
/// The cache lives as long as the driver instance.
pub struct TableRegistry {
    prefix: String,
    suffix: String,
    /// Explicit per-entity table names from config; these skip derivation.
    overrides: BTreeMap<String, String>,
    known: Mutex<HashSet<String>>,
}

impl TableRegistry {
    pub fn new(driver: &DriverConfig, entities: &BTreeMap<String, EntityConfig>) -> Self {
        let overrides = entities
            .iter()
            .filter_map(|(entity, cfg)| cfg.table.clone().map(|t| (entity.clone(), t)))
            .collect();
        Self {
            prefix: driver.table_prefix.clone(),
            suffix: driver.table_suffix.clone(),
            overrides,
            known: Mutex::new(HashSet::new()),
        }
    }

    /// Physical table name for an entity type: the config override when
    /// present, otherwise the deterministic derivation.
    pub fn table_name(&self, entity_type: &str) -> String {
        if let Some(table) = self.overrides.get(entity_type) {
            return table.clone();
        }
        derive_table_name(entity_type, &self.prefix, &self.suffix)
    }

    /// Whether the cache says this table exists.
    pub fn is_known(&self, table: &str) -> bool {
        self.known
            .lock()
            .map(|known| known.contains(table))
            .unwrap_or(false)
    }

    /// Record that this table exists.
    pub fn mark_known(&self, table: &str) {
        if let Ok(mut known) = self.known.lock() {
            known.insert(table.to_string());
        }
    }
}

/// Backend existence check, used on cache miss.
pub fn table_exists(conn: &Connection, table: &str) -> ChronicleResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count > 0)
}

/// Derive the physical table name for an entity type: last path segment,
/// snake-cased, pluralized, wrapped in the configured prefix and suffix.
/// Stable for a given input; both the write path and the retention engine
/// depend on deriving the same name.
pub fn derive_table_name(entity_type: &str, prefix: &str, suffix: &str) -> String {
    let base = entity_type.rsplit("::").next().unwrap_or(entity_type);
    format!("{prefix}{}{suffix}", pluralize(&snake_case(base)))
}

fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let after_lower = prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            // An uppercase run ends where the next char is lowercase
            // (HTTPServer -> http_server).
            let run_boundary =
                prev.is_some_and(char::is_uppercase) && next.is_some_and(|n| n.is_lowercase());
            if after_lower || run_boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        let vowel_y = stem
            .chars()
            .last()
            .is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
        if !vowel_y && !stem.is_empty() {
            return format!("{stem}ies");
        }
    }
    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{word}es");
    }
    format!("{word}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_prefixed_pluralized_snake_case() {
        assert_eq!(derive_table_name("User", "audit_", "_logs"), "audit_users_logs");
        assert_eq!(
            derive_table_name("BlogPost", "audit_", "_logs"),
            "audit_blog_posts_logs"
        );
    }

    #[test]
    fn uses_only_the_last_path_segment() {
        assert_eq!(
            derive_table_name("billing::Invoice", "audit_", "_logs"),
            "audit_invoices_logs"
        );
        assert_eq!(
            derive_table_name("app::models::User", "a_", "_l"),
            "a_users_l"
        );
    }

    #[test]
    fn pluralization_rules() {
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("key"), "keys");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("status"), "statuses");
        assert_eq!(pluralize("branch"), "branches");
        assert_eq!(pluralize("post"), "posts");
    }

    #[test]
    fn snake_case_handles_acronym_runs() {
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(snake_case("OrderV2"), "order_v2");
    }

    #[test]
    fn override_skips_derivation() {
        let driver = DriverConfig::default();
        let mut entities = BTreeMap::new();
        entities.insert(
            "User".to_string(),
            EntityConfig {
                table: Some("custom_user_audit".to_string()),
                ..Default::default()
            },
        );
        let registry = TableRegistry::new(&driver, &entities);
        assert_eq!(registry.table_name("User"), "custom_user_audit");
        assert_eq!(registry.table_name("Post"), "audit_posts_logs");
    }
}
