use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::retention_settings::RetentionOverride;

/// Per-entity registration: optional explicit table name, field masking
/// rules, and a retention override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Explicit physical table name; derived from the entity type when
    /// absent.
    pub table: Option<String>,
    /// Field names stripped from captured payloads.
    pub exclude: Vec<String>,
    /// Field allow-list. `None` or `["*"]` means all fields.
    pub include: Option<Vec<String>>,
    /// Retention override for this entity.
    pub retention: Option<RetentionOverride>,
}

impl EntityConfig {
    /// Apply include/exclude masking to a captured payload object.
    ///
    /// With a wildcard (or absent) include list, all fields pass except the
    /// excluded ones; otherwise only included-minus-excluded fields pass.
    /// Non-object values pass through untouched.
    pub fn filter_values(&self, values: &Value) -> Value {
        let Value::Object(map) = values else {
            return values.clone();
        };

        let include_all = match &self.include {
            None => true,
            Some(list) => list.iter().any(|f| f == "*"),
        };

        let filtered = map
            .iter()
            .filter(|(key, _)| {
                if self.exclude.iter().any(|f| f == *key) {
                    return false;
                }
                if include_all {
                    return true;
                }
                self.include
                    .as_ref()
                    .is_some_and(|list| list.iter().any(|f| f == *key))
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Value::Object(filtered)
    }
}
