//! The three mutually exclusive cleanup strategies behind one trait.

mod anonymize;
mod archive;
mod delete;

use std::collections::HashMap;
use std::sync::Arc;

use chronicle_core::retention::StrategyKind;
use chronicle_core::traits::RetentionStrategy;
use chronicle_storage::AuditStore;

pub use anonymize::AnonymizeStrategy;
pub use archive::ArchiveStrategy;
pub use delete::DeleteStrategy;

/// Build the strategy registry: one instance per tag, constructed once at
/// service startup and selected by the resolved policy's kind.
pub fn build_registry(
    store: &Arc<AuditStore>,
) -> HashMap<StrategyKind, Box<dyn RetentionStrategy + Send + Sync>> {
    let mut strategies: HashMap<StrategyKind, Box<dyn RetentionStrategy + Send + Sync>> =
        HashMap::new();
    strategies.insert(
        StrategyKind::Delete,
        Box::new(DeleteStrategy::new(Arc::clone(store))),
    );
    strategies.insert(
        StrategyKind::Archive,
        Box::new(ArchiveStrategy::new(Arc::clone(store))),
    );
    strategies.insert(
        StrategyKind::Anonymize,
        Box::new(AnonymizeStrategy::new(Arc::clone(store))),
    );
    strategies
}
