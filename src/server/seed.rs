//! Default staff account

use crate::core::auth::Role;
use crate::core::credentials::hash_password;
use crate::core::entity::{EntityType, Record};
use crate::core::store::RecordStore;
use anyhow::Result;
use serde_json::Value;

pub const DEFAULT_EMAIL: &str = "staff@swinpayroll.xyz";
pub const DEFAULT_PASSWORD: &str = "password";

/// Insert the default level1 account unless a user with its email exists
///
/// Returns the id of the inserted user, or `None` when nothing was done.
pub async fn seed_default_user(store: &dyn RecordStore) -> Result<Option<String>> {
    let email = Value::from(DEFAULT_EMAIL);
    if store
        .find_first_where(EntityType::User, "email", &email)
        .await?
        .is_some()
    {
        return Ok(None);
    }

    let hash = hash_password(DEFAULT_PASSWORD)?;
    let mut user = Record::new();
    user.insert("name".to_string(), Value::from("Staff"));
    user.insert("email".to_string(), email);
    user.insert("password_hash".to_string(), Value::String(hash));
    user.insert("role".to_string(), Value::from(Role::Level1.as_str()));

    let id = store.insert(EntityType::User, user).await?;
    tracing::info!(user_id = %id, email = DEFAULT_EMAIL, "seeded default user");
    Ok(Some(id))
}
