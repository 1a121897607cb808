//! Recursive redaction of sensitive fields in semi-structured payloads.
//!
//! Pure functions over `serde_json::Value`: a new tree comes back, the
//! input is never mutated.

use serde_json::Value;

/// Replacement written over any sensitive field's value.
pub const SENTINEL: &str = "[ANONYMIZED]";

/// Field-name markers, matched case-insensitively as substrings.
///
/// Substring matching is deliberately broad: "name" also hits "username"
/// and "filename". Consumers depend on that reach, so the list redacts
/// more rather than less.
pub const SENSITIVE_FIELD_MARKERS: &[&str] = &[
    "email",
    "phone",
    "address",
    "ip_address",
    "user_agent",
    "name",
    "first_name",
    "last_name",
    "full_name",
];

/// Whether a field name carries one of the sensitive markers.
pub fn is_sensitive_field(field: &str) -> bool {
    let field = field.to_lowercase();
    SENSITIVE_FIELD_MARKERS
        .iter()
        .any(|marker| field.contains(marker))
}

/// Redact a payload tree. Scalar values under a sensitive key become the
/// sentinel; container values are recursed into regardless of their key,
/// so nested structures keep their shape with only leaves replaced.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let redacted = map
                .iter()
                .map(|(key, v)| {
                    let replacement = match v {
                        Value::Object(_) | Value::Array(_) => redact(v),
                        _ if is_sensitive_field(key) => Value::String(SENTINEL.to_string()),
                        _ => v.clone(),
                    };
                    (key.clone(), replacement)
                })
                .collect();
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

/// Redact a serialized payload column. Text that does not decode to a
/// JSON container passes through untouched, mirroring the write path
/// (which only ever stores serialized objects).
pub fn redact_serialized(text: &str) -> String {
    if text.is_empty() {
        return text.to_string();
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => {
            serde_json::to_string(&redact(&value)).unwrap_or_else(|_| text.to_string())
        }
        _ => text.to_string(),
    }
}
