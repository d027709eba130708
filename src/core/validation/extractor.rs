//! Axum extractor for validated payloads
//!
//! `Validated` unwraps the `{ "<singular>": { ... } }` envelope, runs the
//! validation engine for the route's entity type, and hands the handler a
//! cleaned payload. Creates are `POST`; every other method is an update of
//! the record named by the `{id}` path segment.

use super::engine::{ValidationEngine, ValidationOutcome};
use crate::core::auth::Actor;
use crate::core::entity::{EntityType, Record};
use crate::core::error::{PayrollError, RequestError, ValidationError};
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::Method;
use serde_json::Value;

/// State that knows which entity a route validates
pub trait ValidationTarget: Send + Sync {
    fn validation_engine(&self) -> &ValidationEngine;
    fn entity_type(&self) -> EntityType;
}

/// A payload that passed validation
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_record(
///     State(state): State<ResourceState>,
///     WriteAccess(actor): WriteAccess,
///     Validated { payload, .. }: Validated,
/// ) -> Result<StatusCode, PayrollError> {
///     // payload is whitelisted, normalized, and valid
/// }
/// ```
///
/// The requester is read from the request extensions, where the access
/// extractors leave it; without one the engine sees [`Actor::Anonymous`].
#[derive(Debug, Clone)]
pub struct Validated {
    pub payload: Record,
    /// The `{id}` path segment, `None` on create
    pub record_id: Option<String>,
}

impl<S> FromRequest<S> for Validated
where
    S: ValidationTarget,
{
    type Rejection = PayrollError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_new = req.method() == Method::POST;
        let (mut parts, body) = req.into_parts();

        let actor = parts
            .extensions
            .get::<Actor>()
            .cloned()
            .unwrap_or(Actor::Anonymous);

        let record_id = if is_new {
            None
        } else {
            let Path(id) = Path::<String>::from_request_parts(&mut parts, state)
                .await
                .map_err(|e| RequestError::InvalidBody {
                    message: e.body_text(),
                })?;
            Some(id)
        };

        let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(|e| RequestError::InvalidBody {
                message: e.body_text(),
            })?;
        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        let entity = state.entity_type();
        let raw = unwrap_envelope(body, entity)?;

        let outcome = state
            .validation_engine()
            .validate(entity, is_new, raw, &actor, record_id.as_deref())
            .await?;

        match outcome {
            ValidationOutcome::Valid(payload) => Ok(Validated { payload, record_id }),
            ValidationOutcome::Invalid(errors) => {
                tracing::warn!(
                    table = entity.table_name(),
                    errors = ?errors,
                    "validation failed"
                );
                Err(ValidationError::FieldErrors(errors).into())
            }
            ValidationOutcome::NotFound => Err(PayrollError::not_found(
                entity.singular(),
                record_id.unwrap_or_default(),
            )),
        }
    }
}

/// Take the payload out of its envelope
///
/// A string envelope value is itself parsed as JSON. A missing envelope
/// yields `null`, which the engine treats as an empty payload.
pub fn unwrap_envelope(body: Value, entity: EntityType) -> Result<Value, PayrollError> {
    let Value::Object(mut body) = body else {
        return Ok(Value::Null);
    };
    match body.remove(entity.singular()) {
        Some(Value::String(text)) => Ok(serde_json::from_str(&text)?),
        Some(value) => Ok(value),
        None => Ok(Value::Null),
    }
}
