//! In-memory record store for testing and development

use crate::core::entity::{EntityType, Record};
use crate::core::store::{CREATED_FIELD, ID_FIELD, RecordStore, UPDATED_FIELD};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

type Tables = HashMap<EntityType, IndexMap<String, Record>>;

/// In-memory record store
///
/// One insertion-ordered table per entity type behind a single `RwLock`.
/// Clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records of one type
    pub fn count(&self, entity: EntityType) -> Result<usize> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(tables.get(&entity).map_or(0, IndexMap::len))
    }
}

fn now() -> Value {
    Value::String(chrono::Utc::now().to_rfc3339())
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_by_id(&self, entity: EntityType, id: &str) -> Result<Option<Record>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(tables.get(&entity).and_then(|table| table.get(id)).cloned())
    }

    async fn find_first_where(
        &self,
        entity: EntityType,
        field: &str,
        value: &Value,
    ) -> Result<Option<Record>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(tables.get(&entity).and_then(|table| {
            table
                .values()
                .find(|record| record.get(field) == Some(value))
                .cloned()
        }))
    }

    async fn list(&self, entity: EntityType) -> Result<Vec<Record>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(tables
            .get(&entity)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, entity: EntityType, mut record: Record) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let timestamp = now();
        record.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        record.insert(CREATED_FIELD.to_string(), timestamp.clone());
        record.insert(UPDATED_FIELD.to_string(), timestamp);

        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        tables.entry(entity).or_default().insert(id.clone(), record);

        Ok(id)
    }

    async fn update(&self, entity: EntityType, id: &str, changes: Record) -> Result<bool> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(record) = tables.get_mut(&entity).and_then(|table| table.get_mut(id)) else {
            return Ok(false);
        };

        for (field, value) in changes {
            if field != ID_FIELD && field != CREATED_FIELD {
                record.insert(field, value);
            }
        }
        record.insert(UPDATED_FIELD.to_string(), now());

        Ok(true)
    }

    async fn delete(&self, entity: EntityType, id: &str) -> Result<bool> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(tables
            .get_mut(&entity)
            .and_then(|table| table.shift_remove(id))
            .is_some())
    }
}
