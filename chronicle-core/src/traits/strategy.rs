use chrono::{DateTime, Utc};

use crate::errors::ChronicleResult;
use crate::retention::RetentionPolicy;

/// One cleanup algorithm over one entity's storage.
///
/// Implementations process storage in bounded passes of
/// `policy.batch_size` records and stop as soon as a pass comes up short,
/// so memory and lock duration stay bounded regardless of backlog size.
/// The loop has a safe stopping point after every pass, never mid-batch.
pub trait RetentionStrategy {
    /// The strategy's config tag.
    fn name(&self) -> &'static str;

    /// Whether this strategy can run under the given policy. Selecting a
    /// strategy that cannot execute is a result-level error, not a panic.
    fn can_execute(&self, policy: &RetentionPolicy) -> bool;

    /// Run the strategy with an explicit reference time. Returns the
    /// number of records processed.
    fn execute_at(
        &self,
        entity_type: &str,
        policy: &RetentionPolicy,
        now: DateTime<Utc>,
    ) -> ChronicleResult<usize>;

    /// Run the strategy against the current clock.
    fn execute(&self, entity_type: &str, policy: &RetentionPolicy) -> ChronicleResult<usize> {
        self.execute_at(entity_type, policy, Utc::now())
    }
}
