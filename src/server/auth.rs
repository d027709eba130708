//! Log-in and token verification endpoints
//!
//! - POST /auth/log_in  with `{ "email", "password" }`
//! - GET  /auth/verify?token=...
//!
//! Both answer with the user (without `password_hash`) plus a fresh token.

use super::resources::present;
use super::state::AppState;
use crate::core::credentials::verify_password;
use crate::core::entity::{EntityType, Record};
use crate::core::error::{PayrollError, PayrollResult, RequestError, StorageError};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct LogInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub token: Option<String>,
}

pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/log_in", post(log_in))
        .route("/auth/verify", get(verify))
        .with_state(state)
}

fn unauthorized(message: &str) -> PayrollError {
    RequestError::Unauthorized {
        message: message.to_string(),
    }
    .into()
}

/// The user without secrets, plus a newly signed token
fn signed_user(state: &AppState, user: Record) -> PayrollResult<Json<Value>> {
    let id = user
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| PayrollError::Internal("stored user has no id".to_string()))?;
    let token = state
        .tokens
        .issue(id)
        .map_err(|e| PayrollError::Internal(e.to_string()))?;

    let mut body = present(user);
    body.insert("token".to_string(), Value::String(token));
    Ok(Json(Value::Object(body)))
}

pub async fn log_in(
    State(state): State<AppState>,
    Json(request): Json<LogInRequest>,
) -> PayrollResult<Json<Value>> {
    let email = Value::String(request.email.to_lowercase());
    let user = state
        .store
        .find_first_where(EntityType::User, "email", &email)
        .await
        .map_err(|e| StorageError::query(EntityType::User, "look up", e))?
        .ok_or_else(|| unauthorized("invalid email or password"))?;

    let hash = user
        .get("password_hash")
        .and_then(Value::as_str)
        .ok_or_else(|| unauthorized("invalid email or password"))?;
    let matches = verify_password(&request.password, hash)
        .map_err(|e| PayrollError::Internal(e.to_string()))?;
    if !matches {
        tracing::warn!(email = %email, "refused log in");
        return Err(unauthorized("invalid email or password"));
    }

    tracing::info!(user_id = ?user.get("id"), "logged in user");
    signed_user(&state, user)
}

pub async fn verify(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> PayrollResult<Json<Value>> {
    let token = query.token.ok_or_else(|| RequestError::InvalidBody {
        message: "missing token".to_string(),
    })?;

    let Some(user) = state.user_for_token(&token).await? else {
        tracing::warn!("refused to verify user, token is invalid");
        return Err(unauthorized("invalid or expired token"));
    };
    signed_user(&state, user)
}
