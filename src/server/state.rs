//! Shared application state

use super::token::TokenIssuer;
use crate::core::auth::{Actor, AuthPolicy, Role};
use crate::core::entity::{EntityType, Record};
use crate::core::error::{PayrollResult, RequestError, StorageError};
use crate::core::store::RecordStore;
use crate::core::validation::ValidationEngine;
use crate::schemas::SchemaRegistry;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde_json::Value;
use std::sync::Arc;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub engine: ValidationEngine,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, registry: SchemaRegistry, tokens: TokenIssuer) -> Self {
        let engine = ValidationEngine::new(Arc::new(registry), store.clone());
        Self {
            store,
            engine,
            tokens,
        }
    }

    /// Resolve a token to the user row it names
    ///
    /// `None` when the token is invalid or expired, or the user is gone.
    pub async fn user_for_token(&self, token: &str) -> PayrollResult<Option<Record>> {
        let claims = match self.tokens.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "rejected token");
                return Ok(None);
            }
        };

        self.store
            .find_by_id(EntityType::User, &claims.sub)
            .await
            .map_err(|e| StorageError::query(EntityType::User, "look up", e).into())
    }

    /// Authenticate the bearer token of a request and check `policy`
    ///
    /// The resolved actor is also left in the request extensions.
    pub async fn authorize(&self, parts: &mut Parts, policy: &AuthPolicy) -> PayrollResult<Actor> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| RequestError::Unauthorized {
                message: "missing bearer token".to_string(),
            })?;

        let user = self
            .user_for_token(token)
            .await?
            .ok_or_else(|| RequestError::Unauthorized {
                message: "invalid or expired token".to_string(),
            })?;

        let actor = actor_of(&user).ok_or_else(|| RequestError::Unauthorized {
            message: "user has no valid role".to_string(),
        })?;

        if !policy.check(&actor) {
            tracing::warn!(
                user_id = actor.user_id().unwrap_or_default(),
                role = ?actor.role(),
                "refused access for role"
            );
            return Err(RequestError::Forbidden {
                message: "role not allowed".to_string(),
            }
            .into());
        }

        parts.extensions.insert(actor.clone());
        Ok(actor)
    }
}

/// Build the actor for a stored user row
pub fn actor_of(user: &Record) -> Option<Actor> {
    let id = user.get("id").and_then(Value::as_str)?;
    let role: Role = user.get("role").and_then(Value::as_str)?.parse().ok()?;
    Some(Actor::user(id, role))
}
