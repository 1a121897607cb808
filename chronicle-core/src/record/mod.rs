//! The audit record value object and its fluent builder.

mod builder;
mod query;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use builder::RecordBuilder;
pub use query::{LogQuery, SortOrder};

/// Well-known lifecycle action tags. Custom tags are allowed anywhere an
/// action string is accepted.
pub mod action {
    pub const CREATED: &str = "created";
    pub const UPDATED: &str = "updated";
    pub const DELETED: &str = "deleted";
    pub const RESTORED: &str = "restored";
    pub const CUSTOM: &str = "custom";
}

/// One immutable audit event.
///
/// Constructed by a collaborator at the moment of change capture, written
/// exactly once through the storage driver, and thereafter touched only by
/// the retention engine (anonymized or deleted). At least one of
/// `old_values` / `new_values` is expected to be present unless the action
/// is a custom, value-less event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Stable identifier of the audited kind, e.g. `User` or
    /// `billing::Invoice`. Only the last `::` segment feeds table naming.
    pub entity_type: String,
    /// Identifier of the audited instance, stored as text.
    pub entity_id: String,
    /// Action tag; see [`action`] for the lifecycle set.
    pub action: String,
    /// State before the change, when there is one.
    pub old_values: Option<Value>,
    /// State after the change, when there is one.
    pub new_values: Option<Value>,
    /// Kind of the actor that caused the change; opaque to the core.
    pub causer_type: Option<String>,
    /// Identifier of the actor, stored as text.
    pub causer_id: Option<String>,
    /// Free-form context; always an object, defaults to `{}`.
    pub metadata: Value,
    /// Capture time, UTC.
    pub created_at: DateTime<Utc>,
    /// Origin tag (console command, HTTP handler, ...).
    pub source: Option<String>,
}

impl AuditRecord {
    /// Start building a record for an entity instance.
    pub fn builder(
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> RecordBuilder {
        RecordBuilder::new(entity_type, entity_id)
    }
}
