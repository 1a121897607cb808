//! The retention orchestrator: resolves per-entity policy, selects a
//! strategy, and aggregates outcomes across all configured entities.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chronicle_core::config::{AuditConfig, RetentionSettings};
use chronicle_core::errors::{ChronicleResult, ConfigError};
use chronicle_core::retention::{RetentionPolicy, RetentionResult, StrategyKind};
use chronicle_core::traits::RetentionStrategy;
use chronicle_storage::AuditStore;

use crate::strategy;

/// Runs retention for one or all configured entities.
///
/// Stateless between runs: each run is an independent traversal with no
/// persisted cursor. A crashed run simply reprocesses still-stale records
/// next time; every strategy is idempotent over overlapping ranges.
pub struct RetentionService {
    config: Arc<AuditConfig>,
    store: Arc<AuditStore>,
    strategies: HashMap<StrategyKind, Box<dyn RetentionStrategy + Send + Sync>>,
}

impl RetentionService {
    pub fn new(config: Arc<AuditConfig>, store: Arc<AuditStore>) -> Self {
        let strategies = strategy::build_registry(&store);
        Self {
            config,
            store,
            strategies,
        }
    }

    /// Run retention for every configured entity. One entity's failure is
    /// recorded and the run continues; partial success is the normal
    /// outcome of a heterogeneous run.
    pub fn run_cleanup(&self) -> RetentionResult {
        if !self.is_retention_enabled() {
            return RetentionResult::empty();
        }

        let start = Instant::now();
        let mut overall = RetentionResult::empty();

        let entity_types: Vec<String> = self.config.entities.keys().cloned().collect();
        for entity_type in entity_types {
            match self.run_cleanup_for_entity(&entity_type) {
                Ok(result) => overall = overall.merge(&result),
                Err(e) => {
                    tracing::warn!(entity_type = %entity_type, error = %e, "retention failed for entity");
                    overall =
                        overall.add_error(format!("Failed to process entity {entity_type}: {e}"));
                }
            }
        }

        let overall = overall.with_execution_time(start.elapsed());
        tracing::info!(
            total_processed = overall.total_processed,
            errors = overall.errors.len(),
            "retention run complete"
        );
        overall
    }

    /// Run retention for one entity.
    ///
    /// Disabled (globally, per entity, or unregistered) is a valid steady
    /// state and returns an empty result. Policy resolution for this
    /// explicitly-targeted entity fails fast; errors during strategy
    /// execution are converted into a zero-processed result carrying the
    /// error string.
    pub fn run_cleanup_for_entity(&self, entity_type: &str) -> ChronicleResult<RetentionResult> {
        if !self.is_retention_enabled_for_entity(entity_type) {
            return Ok(RetentionResult::empty());
        }

        let start = Instant::now();
        let policy = self.resolve_policy(entity_type)?;

        let strategy = self
            .strategies
            .get(&policy.strategy)
            .ok_or_else(|| ConfigError::UnknownStrategy {
                name: policy.strategy.to_string(),
            })?;

        if !strategy.can_execute(&policy) {
            return Ok(RetentionResult::empty().add_error(format!(
                "Strategy '{}' cannot execute for entity {entity_type}",
                strategy.name()
            )));
        }

        match strategy.execute(entity_type, &policy) {
            Ok(processed) => Ok(RetentionResult::from_single(
                entity_type,
                processed,
                start.elapsed(),
            )),
            Err(e) => {
                tracing::warn!(
                    entity_type = %entity_type,
                    strategy = strategy.name(),
                    error = %e,
                    "retention strategy failed"
                );
                Ok(
                    RetentionResult::from_single(entity_type, 0, start.elapsed())
                        .add_error(format!("Error processing {entity_type}: {e}")),
                )
            }
        }
    }

    /// Resolve the merged, validated policy for an entity. Fails fast for
    /// unregistered entities and misconfigured settings.
    pub fn resolve_policy(&self, entity_type: &str) -> ChronicleResult<RetentionPolicy> {
        let settings =
            self.config
                .retention_for(entity_type)
                .ok_or_else(|| ConfigError::EntityNotRegistered {
                    entity_type: entity_type.to_string(),
                })?;
        let table_name = self.store.table_name(entity_type);
        Ok(RetentionPolicy::from_settings(
            &settings,
            entity_type,
            &table_name,
        )?)
    }

    /// Merged (global plus override) retention settings for an entity, or
    /// `None` when unregistered. Serves dry-run reporting.
    pub fn retention_config(&self, entity_type: &str) -> Option<RetentionSettings> {
        self.config.retention_for(entity_type)
    }

    pub fn is_retention_enabled(&self) -> bool {
        self.config.retention.enabled
    }

    /// False when retention is globally off or the entity is not
    /// registered; a registered entity without an explicit `enabled`
    /// override defaults to enabled.
    pub fn is_retention_enabled_for_entity(&self, entity_type: &str) -> bool {
        if !self.is_retention_enabled() {
            return false;
        }
        self.config
            .retention_for(entity_type)
            .map(|settings| settings.enabled)
            .unwrap_or(false)
    }
}
