use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Outcome of one retention run (single entity or aggregate).
///
/// A non-empty error list signals partial success, not total failure:
/// counts and the per-entity breakdown are always reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetentionResult {
    pub total_processed: usize,
    /// Per-entity processed counts.
    pub entities_processed: BTreeMap<String, usize>,
    /// Error strings accumulated without aborting the run.
    pub errors: Vec<String>,
    pub execution_time: Duration,
}

impl RetentionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Result of a single entity's run.
    pub fn from_single(entity_type: &str, processed: usize, execution_time: Duration) -> Self {
        let mut entities_processed = BTreeMap::new();
        entities_processed.insert(entity_type.to_string(), processed);
        Self {
            total_processed: processed,
            entities_processed,
            errors: Vec::new(),
            execution_time,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_successful(&self) -> bool {
        !self.has_errors()
    }

    /// Combine with another result: sum counts and durations, union the
    /// per-entity map, concatenate errors.
    pub fn merge(mut self, other: &Self) -> Self {
        self.total_processed += other.total_processed;
        for (entity, count) in &other.entities_processed {
            *self.entities_processed.entry(entity.clone()).or_insert(0) += count;
        }
        self.errors.extend(other.errors.iter().cloned());
        self.execution_time += other.execution_time;
        self
    }

    /// Append an error without touching the counts.
    pub fn add_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    /// Replace the accumulated duration with a measured wall-clock one
    /// (the aggregate run reports elapsed time, not the sum of parts).
    pub fn with_execution_time(mut self, execution_time: Duration) -> Self {
        self.execution_time = execution_time;
        self
    }
}
