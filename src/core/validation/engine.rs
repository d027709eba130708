//! The validation engine
//!
//! Applies an entity schema to a candidate payload. Every declared attribute
//! is checked in declaration order. A failure in steps 1 to 3 ends the checks
//! for that attribute; later steps each add their own message:
//!
//! 1. equal-to another attribute
//! 2. required
//! 3. kind (optional attributes of the wrong kind are dropped, not reported)
//! 4. uniqueness
//! 5. allowed values, else pattern
//! 6. length
//! 7. custom check, which may report several messages
//!
//! Expected failures come back as a [`ValidationOutcome`]; only store faults
//! and unknown entity types are errors.

use super::filters;
use super::rule::{CheckContext, FieldRule, RequirednessContext};
use crate::core::auth::Actor;
use crate::core::entity::{EntityType, Record};
use crate::core::error::{FieldError, PayrollResult, StorageError};
use crate::core::store::RecordStore;
use crate::schemas::SchemaRegistry;
use serde_json::Value;
use std::sync::Arc;

/// Result of a validation call
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The cleaned payload: whitelisted, normalized, wrong-kind optionals removed
    Valid(Record),

    /// Errors in attribute declaration order
    Invalid(Vec<FieldError>),

    /// The record targeted by an update does not exist
    NotFound,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    /// The reported errors, empty unless the outcome is `Invalid`
    pub fn errors(&self) -> &[FieldError] {
        match self {
            ValidationOutcome::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

/// Runs entity schemas against candidate payloads
#[derive(Clone)]
pub struct ValidationEngine {
    registry: Arc<SchemaRegistry>,
    store: Arc<dyn RecordStore>,
}

impl ValidationEngine {
    pub fn new(registry: Arc<SchemaRegistry>, store: Arc<dyn RecordStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validate a payload for a create (`is_new`) or an update of `record_id`
    ///
    /// A payload that is not a JSON object is treated as empty. The engine
    /// never writes to the store.
    pub async fn validate(
        &self,
        entity: EntityType,
        is_new: bool,
        raw: Value,
        actor: &Actor,
        record_id: Option<&str>,
    ) -> PayrollResult<ValidationOutcome> {
        let schema = self.registry.schema_for(entity)?;

        let mut payload = match raw {
            Value::Object(map) => map,
            _ => Record::new(),
        };

        let stored = if is_new {
            None
        } else {
            let Some(id) = record_id else {
                return Ok(ValidationOutcome::NotFound);
            };
            match self
                .store
                .find_by_id(entity, id)
                .await
                .map_err(|e| StorageError::query(entity, "look up", e))?
            {
                Some(record) => Some(record),
                None => return Ok(ValidationOutcome::NotFound),
            }
        };

        filters::whitelist(&mut payload, schema);
        filters::normalize(&mut payload, schema);

        let mut errors = Vec::new();
        for (attribute, rule) in schema.iter() {
            let messages = self
                .check_attribute(
                    entity,
                    attribute,
                    rule,
                    &mut payload,
                    stored.as_ref(),
                    is_new,
                    actor,
                )
                .await?;
            errors.extend(
                messages
                    .into_iter()
                    .map(|message| FieldError::new(attribute, message)),
            );
        }

        if errors.is_empty() {
            Ok(ValidationOutcome::Valid(payload))
        } else {
            tracing::debug!(
                entity_type = %entity,
                count = errors.len(),
                "payload rejected"
            );
            Ok(ValidationOutcome::Invalid(errors))
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn check_attribute(
        &self,
        entity: EntityType,
        attribute: &'static str,
        rule: &FieldRule,
        payload: &mut Record,
        stored: Option<&Record>,
        is_new: bool,
        actor: &Actor,
    ) -> PayrollResult<Vec<String>> {
        let value = payload.get(attribute).cloned();

        if let Some(other) = rule.equal_to {
            let other_value = payload.get(other);
            let either_present = !is_blank(value.as_ref()) || !is_blank(other_value);
            if either_present && value.as_ref() != other_value {
                return Ok(vec![format!("does not match {}", start_case(other))]);
            }
        }

        let required = rule.requiredness.resolve(&RequirednessContext {
            is_new,
            payload,
            actor,
        });
        if required && is_blank(value.as_ref()) {
            return Ok(vec!["can't be blank".to_string()]);
        }

        let value = match value {
            Some(value) if rule.kind.matches(&value) => value,
            _ => {
                if required {
                    return Ok(vec!["is invalid".to_string()]);
                }
                payload.remove(attribute);
                return Ok(vec![]);
            }
        };

        let mut messages = Vec::new();

        let changed = is_new || stored.and_then(|s| s.get(attribute)) != Some(&value);
        if rule.unique && changed {
            let existing = self
                .store
                .find_first_where(entity, attribute, &value)
                .await
                .map_err(|e| StorageError::query(entity, "check uniqueness of", e))?;
            if existing.is_some() {
                messages.push("is already in use".to_string());
            }
        }

        if let Some(allowed) = rule.allowed_values {
            if !value.as_str().is_some_and(|s| allowed.contains(&s)) {
                messages.push("is invalid".to_string());
            }
        } else if let Some(pattern) = &rule.pattern {
            if !pattern.regex.is_match(&as_text(&value)) {
                messages.push(pattern.message.unwrap_or("is invalid").to_string());
            }
        }

        if let Some(text) = value.as_str().filter(|s| !s.is_empty()) {
            // Lengths are in UTF-16 code units, as browser clients count them
            let length = text.encode_utf16().count();
            if let Some(min) = rule.min_length.filter(|min| length < *min) {
                messages.push(format!("can't be shorter than {} characters", min));
            } else if let Some(max) = rule.max_length.filter(|max| length > *max) {
                messages.push(format!("can't be longer than {} characters", max));
            }
        }

        if let Some(check) = &rule.custom {
            let ctx = CheckContext {
                attribute,
                value: &value,
                payload,
                stored,
                store: self.store.as_ref(),
            };
            let reported = check
                .check(ctx)
                .await
                .map_err(|e| StorageError::query(entity, "check", e))?;
            messages.extend(reported);
        }

        Ok(messages)
    }
}

/// Null, absent, or the empty string
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// `"password_confirmation"` → `"Password Confirmation"`
pub fn start_case(attribute: &str) -> String {
    attribute
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text a pattern is matched against; non-strings use their JSON rendering
fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
