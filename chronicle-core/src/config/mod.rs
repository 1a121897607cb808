//! Configuration consumed (not owned) by the core.
//!
//! Loading from files, env, or a host framework is a collaborator concern;
//! the core receives these structs fully assembled.

pub mod defaults;

mod driver;
mod entity;
mod retention_settings;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use driver::{ConnectionTarget, DriverConfig};
pub use entity::EntityConfig;
pub use retention_settings::{RetentionOverride, RetentionSettings};

/// Top-level audit configuration: one driver, optional archive backends,
/// global retention defaults, and the per-entity registration map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Primary storage backend and table naming.
    pub driver: DriverConfig,
    /// Gates on-demand schema creation on first use.
    pub auto_migration: bool,
    /// Named secondary backends usable as archive targets.
    pub archives: BTreeMap<String, ConnectionTarget>,
    /// Global retention defaults, overridable per entity.
    pub retention: RetentionSettings,
    /// Registered entity types. Only registered entities participate in
    /// retention runs.
    pub entities: BTreeMap<String, EntityConfig>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            driver: DriverConfig::default(),
            auto_migration: defaults::DEFAULT_AUTO_MIGRATION,
            archives: BTreeMap::new(),
            retention: RetentionSettings::default(),
            entities: BTreeMap::new(),
        }
    }
}

impl AuditConfig {
    /// Merged retention settings for an entity: global defaults with the
    /// entity's override applied field-by-field (override wins).
    /// `None` when the entity is not registered.
    pub fn retention_for(&self, entity_type: &str) -> Option<RetentionSettings> {
        let entity = self.entities.get(entity_type)?;
        Some(match &entity.retention {
            Some(overrides) => overrides.apply_to(&self.retention),
            None => self.retention.clone(),
        })
    }
}
