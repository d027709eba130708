//! Payload transforms applied between validation and storage

use crate::core::credentials::hash_password;
use crate::core::entity::{EntityType, Record};
use crate::core::error::{PayrollError, PayrollResult, StorageError};
use crate::core::store::RecordStore;
use async_trait::async_trait;
use serde_json::Value;

/// Rewrites a validated payload before it is stored
#[async_trait]
pub trait PayloadTransform: Send + Sync {
    async fn apply(&self, store: &dyn RecordStore, payload: Record) -> PayrollResult<Record>;
}

/// Replaces the plaintext password with an Argon2id `password_hash`
///
/// The plaintext and its confirmation are never stored. Without a password
/// (an update that keeps the current one) no hash is written.
pub struct HashPassword;

#[async_trait]
impl PayloadTransform for HashPassword {
    async fn apply(&self, _store: &dyn RecordStore, mut payload: Record) -> PayrollResult<Record> {
        payload.remove("password_confirmation");
        let password = match payload.remove("password") {
            Some(Value::String(password)) if !password.is_empty() => password,
            _ => return Ok(payload),
        };

        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| PayrollError::Internal(format!("password hashing task failed: {}", e)))?
            .map_err(|e| PayrollError::Internal(e.to_string()))?;

        payload.insert("password_hash".to_string(), Value::String(hash));
        Ok(payload)
    }
}

/// Copies the employee's position name and rates onto a payroll entry
///
/// Missing rows fall back to `"Unknown"` and zero rates.
pub struct PayrollSnapshot;

#[async_trait]
impl PayloadTransform for PayrollSnapshot {
    async fn apply(&self, store: &dyn RecordStore, mut payload: Record) -> PayrollResult<Record> {
        let employee = match payload.get("employee_id").and_then(Value::as_str) {
            Some(id) => store
                .find_by_id(EntityType::Employee, id)
                .await
                .map_err(|e| StorageError::query(EntityType::Employee, "look up", e))?,
            None => None,
        };

        let position_id = employee
            .as_ref()
            .and_then(|e| e.get("position_id"))
            .and_then(Value::as_str);
        let position = match position_id {
            Some(id) => store
                .find_by_id(EntityType::Position, id)
                .await
                .map_err(|e| StorageError::query(EntityType::Position, "look up", e))?,
            None => None,
        };

        let position_name = position
            .as_ref()
            .and_then(|p| p.get("name"))
            .cloned()
            .unwrap_or_else(|| Value::from("Unknown"));
        let rate = |field: &str| {
            employee
                .as_ref()
                .and_then(|e| e.get(field))
                .filter(|v| v.is_number())
                .cloned()
                .unwrap_or_else(|| Value::from(0))
        };

        payload.insert("employee_position".to_string(), position_name);
        payload.insert("employee_hourly_rate".to_string(), rate("hourly_rate"));
        payload.insert("employee_overtime_rate".to_string(), rate("overtime_rate"));
        Ok(payload)
    }
}
