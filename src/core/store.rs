//! Record store trait
//!
//! The persistence seam shared by the validation engine (existence and
//! uniqueness lookups) and the CRUD handlers (reads and writes).

use crate::core::entity::{EntityType, Record};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Column holding the record id
pub const ID_FIELD: &str = "id";
/// Column set once on insert
pub const CREATED_FIELD: &str = "create_date";
/// Column refreshed on every write
pub const UPDATED_FIELD: &str = "update_date";

/// Storage for records of every entity type
///
/// Implementations are agnostic to what the records contain; they only
/// manage the `id`, `create_date`, and `update_date` columns.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Get a record by id
    async fn find_by_id(&self, entity: EntityType, id: &str) -> Result<Option<Record>>;

    /// Get the first record whose `field` equals `value`
    async fn find_first_where(
        &self,
        entity: EntityType,
        field: &str,
        value: &Value,
    ) -> Result<Option<Record>>;

    /// List all records of a type, in insertion order
    async fn list(&self, entity: EntityType) -> Result<Vec<Record>>;

    /// Insert a new record and return its generated id
    async fn insert(&self, entity: EntityType, record: Record) -> Result<String>;

    /// Merge `changes` into an existing record
    ///
    /// Returns `false` when no record has this id.
    async fn update(&self, entity: EntityType, id: &str, changes: Record) -> Result<bool>;

    /// Delete a record
    ///
    /// Returns `false` when no record has this id.
    async fn delete(&self, entity: EntityType, id: &str) -> Result<bool>;
}
