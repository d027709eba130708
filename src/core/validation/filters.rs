//! Payload filters
//!
//! Whitelisting and string normalization applied before any rule runs.

use super::schema::EntitySchema;
use crate::core::entity::Record;
use serde_json::Value;

/// Filter: trim whitespace from string
pub fn trim(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        other => other,
    }
}

/// Filter: remove embedded newlines, keep every other character
pub fn strip_newlines(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.replace('\n', "")),
        other => other,
    }
}

/// Drop every attribute the schema does not declare
pub fn whitelist(payload: &mut Record, schema: &EntitySchema) {
    payload.retain(|attribute, _| schema.contains(attribute));
}

/// Normalize string values according to each attribute's rule
pub fn normalize(payload: &mut Record, schema: &EntitySchema) {
    for (attribute, value) in payload.iter_mut() {
        let Some(rule) = schema.rule(attribute) else {
            continue;
        };
        let filter: fn(Value) -> Value = if rule.preserve_whitespace {
            strip_newlines
        } else {
            trim
        };
        *value = filter(value.take());
    }
}
