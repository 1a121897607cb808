use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{action, AuditRecord};

/// Fluent builder for [`AuditRecord`], for collaborators emitting custom
/// events outside the create/update/delete lifecycle.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    entity_type: String,
    entity_id: String,
    action: String,
    old_values: Option<Value>,
    new_values: Option<Value>,
    causer_type: Option<String>,
    causer_id: Option<String>,
    metadata: Value,
    created_at: Option<DateTime<Utc>>,
    source: Option<String>,
}

impl RecordBuilder {
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            action: action::CUSTOM.to_string(),
            old_values: None,
            new_values: None,
            causer_type: None,
            causer_id: None,
            metadata: Value::Object(Default::default()),
            created_at: None,
            source: None,
        }
    }

    /// Set the action tag.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Set the "before" state.
    pub fn from(mut self, values: Value) -> Self {
        self.old_values = Some(values);
        self
    }

    /// Set the "after" state.
    pub fn to(mut self, values: Value) -> Self {
        self.new_values = Some(values);
        self
    }

    /// Set the actor identity.
    pub fn causer(mut self, causer_type: impl Into<String>, causer_id: impl Into<String>) -> Self {
        self.causer_type = Some(causer_type.into());
        self.causer_id = Some(causer_id.into());
        self
    }

    /// Attach free-form metadata.
    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Override the capture time; defaults to now.
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Tag the origin of the event.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn build(self) -> AuditRecord {
        AuditRecord {
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            action: self.action,
            old_values: self.old_values,
            new_values: self.new_values,
            causer_type: self.causer_type,
            causer_id: self.causer_id,
            metadata: self.metadata,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            source: self.source,
        }
    }
}
