//! Resource descriptors and the generic CRUD handlers
//!
//! Every entity type is exposed the same way:
//! - GET    /{table}        list
//! - POST   /{table}        create
//! - GET    /{table}/{id}   get one
//! - PUT    /{table}/{id}   update
//! - DELETE /{table}/{id}   delete
//!
//! Descriptors only differ in their access policies and the payload
//! transform run before storage.

use super::state::AppState;
use super::transforms::{HashPassword, PayloadTransform, PayrollSnapshot};
use crate::core::auth::{Actor, AuthPolicy, Role};
use crate::core::entity::{EntityType, Record};
use crate::core::error::{PayrollError, PayrollResult, RequestError, StorageError};
use crate::core::store::RecordStore;
use crate::core::validation::{Validated, ValidationEngine, ValidationTarget};
use axum::extract::{FromRequestParts, Path, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Attribute never returned to clients
pub const HIDDEN_FIELD: &str = "password_hash";

/// How one entity type is exposed over HTTP
#[derive(Clone)]
pub struct ResourceDescriptor {
    pub entity: EntityType,
    pub read: AuthPolicy,
    pub write: AuthPolicy,
    pub transform: Option<Arc<dyn PayloadTransform>>,
}

impl ResourceDescriptor {
    /// Reads for level1 and level2, writes for level1 only
    pub fn new(entity: EntityType) -> Self {
        Self {
            entity,
            read: AuthPolicy::roles(&[Role::Level1, Role::Level2]),
            write: AuthPolicy::roles(&[Role::Level1]),
            transform: None,
        }
    }

    pub fn with_read(mut self, policy: AuthPolicy) -> Self {
        self.read = policy;
        self
    }

    pub fn with_write(mut self, policy: AuthPolicy) -> Self {
        self.write = policy;
        self
    }

    pub fn with_transform(mut self, transform: impl PayloadTransform + 'static) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// The descriptor of every entity type
    pub fn standard() -> Vec<Self> {
        EntityType::ALL
            .into_iter()
            .map(|entity| match entity {
                EntityType::User => Self::new(entity).with_transform(HashPassword),
                EntityType::WeeklyPayrollHistory => Self::new(entity)
                    .with_read(AuthPolicy::Authenticated)
                    .with_write(AuthPolicy::roles(&[Role::Level1, Role::Level2]))
                    .with_transform(PayrollSnapshot),
                _ => Self::new(entity),
            })
            .collect()
    }

    /// Build the CRUD routes for this entity
    pub fn build_routes(self, app: AppState) -> Router {
        let collection = format!("/{}", self.entity.table_name());
        let member = format!("{}/{{id}}", collection);
        let state = ResourceState {
            app,
            descriptor: Arc::new(self),
        };

        Router::new()
            .route(&collection, get(list_records).post(create_record))
            .route(
                &member,
                get(get_record).put(update_record).delete(delete_record),
            )
            .with_state(state)
    }
}

/// Per-resource handler state
#[derive(Clone)]
pub struct ResourceState {
    pub app: AppState,
    pub descriptor: Arc<ResourceDescriptor>,
}

impl ResourceState {
    fn entity(&self) -> EntityType {
        self.descriptor.entity
    }

    async fn transform(&self, payload: Record) -> PayrollResult<Record> {
        match &self.descriptor.transform {
            Some(transform) => transform.apply(self.app.store.as_ref(), payload).await,
            None => Ok(payload),
        }
    }
}

impl ValidationTarget for ResourceState {
    fn validation_engine(&self) -> &ValidationEngine {
        &self.app.engine
    }

    fn entity_type(&self) -> EntityType {
        self.descriptor.entity
    }
}

/// Requester allowed to read this resource
pub struct ReadAccess(pub Actor);

/// Requester allowed to write this resource
pub struct WriteAccess(pub Actor);

impl FromRequestParts<ResourceState> for ReadAccess {
    type Rejection = PayrollError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ResourceState,
    ) -> Result<Self, Self::Rejection> {
        let actor = state.app.authorize(parts, &state.descriptor.read).await?;
        Ok(ReadAccess(actor))
    }
}

impl FromRequestParts<ResourceState> for WriteAccess {
    type Rejection = PayrollError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ResourceState,
    ) -> Result<Self, Self::Rejection> {
        let actor = state.app.authorize(parts, &state.descriptor.write).await?;
        Ok(WriteAccess(actor))
    }
}

/// Strip attributes clients must never see
pub fn present(mut record: Record) -> Record {
    record.remove(HIDDEN_FIELD);
    record
}

fn envelope(key: &str, value: Value) -> Json<Value> {
    let mut body = Map::new();
    body.insert(key.to_string(), value);
    Json(Value::Object(body))
}

pub async fn list_records(
    State(state): State<ResourceState>,
    _access: ReadAccess,
) -> PayrollResult<Json<Value>> {
    let entity = state.entity();
    let records = state
        .app
        .store
        .list(entity)
        .await
        .map_err(|e| StorageError::query(entity, "list", e))?;

    let records = records
        .into_iter()
        .map(|record| Value::Object(present(record)))
        .collect();
    Ok(envelope(entity.table_name(), Value::Array(records)))
}

pub async fn get_record(
    State(state): State<ResourceState>,
    _access: ReadAccess,
    Path(id): Path<String>,
) -> PayrollResult<Json<Value>> {
    let entity = state.entity();
    let record = state
        .app
        .store
        .find_by_id(entity, &id)
        .await
        .map_err(|e| StorageError::query(entity, "get", e))?
        .ok_or_else(|| PayrollError::not_found(entity.singular(), &id))?;

    Ok(envelope(entity.singular(), Value::Object(present(record))))
}

pub async fn create_record(
    State(state): State<ResourceState>,
    WriteAccess(actor): WriteAccess,
    Validated { payload, .. }: Validated,
) -> PayrollResult<StatusCode> {
    let entity = state.entity();
    let payload = state.transform(payload).await?;
    let id = state
        .app
        .store
        .insert(entity, payload)
        .await
        .map_err(|e| StorageError::query(entity, "create", e))?;

    tracing::info!(
        entity_type = %entity,
        record_id = %id,
        user_id = actor.user_id().unwrap_or_default(),
        "created record"
    );
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_record(
    State(state): State<ResourceState>,
    WriteAccess(actor): WriteAccess,
    Validated { payload, record_id }: Validated,
) -> PayrollResult<StatusCode> {
    let entity = state.entity();
    let id = record_id.unwrap_or_default();
    let payload = state.transform(payload).await?;
    let updated = state
        .app
        .store
        .update(entity, &id, payload)
        .await
        .map_err(|e| StorageError::query(entity, "update", e))?;
    if !updated {
        return Err(PayrollError::not_found(entity.singular(), id));
    }

    tracing::info!(
        entity_type = %entity,
        record_id = %id,
        user_id = actor.user_id().unwrap_or_default(),
        "updated record"
    );
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_record(
    State(state): State<ResourceState>,
    WriteAccess(actor): WriteAccess,
    Path(id): Path<String>,
) -> PayrollResult<StatusCode> {
    let entity = state.entity();
    ensure_unreferenced(state.app.store.as_ref(), entity, &id).await?;

    let deleted = state
        .app
        .store
        .delete(entity, &id)
        .await
        .map_err(|e| StorageError::query(entity, "delete", e))?;
    if !deleted {
        return Err(PayrollError::not_found(entity.singular(), id));
    }

    tracing::info!(
        entity_type = %entity,
        record_id = %id,
        user_id = actor.user_id().unwrap_or_default(),
        "deleted record"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Refuse to delete a record that another record still points at
async fn ensure_unreferenced(
    store: &dyn RecordStore,
    entity: EntityType,
    id: &str,
) -> PayrollResult<()> {
    let id = Value::String(id.to_string());
    for &(referrer, field) in entity.referenced_by() {
        let found = store
            .find_first_where(referrer, field, &id)
            .await
            .map_err(|e| StorageError::query(referrer, "look up", e))?;
        if found.is_some() {
            tracing::warn!(
                entity_type = %entity,
                referrer = %referrer,
                field,
                "refused to delete referenced record"
            );
            return Err(RequestError::Conflict {
                message: format!("{} is still referenced by {}", entity, referrer.table_name()),
            }
            .into());
        }
    }
    Ok(())
}
