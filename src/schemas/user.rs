//! User schema
//!
//! Credentials are required on create only and are never trimmed.

use crate::core::auth::Role;
use crate::core::entity::EntityType;
use crate::core::validation::vocabulary::{
    MAX_PASSWORD_LENGTH, MAX_STRING_LENGTH, MIN_PASSWORD_LENGTH, email_regex, on_create,
};
use crate::core::validation::{EntitySchema, FieldRule, ValueKind};

pub fn schema() -> EntitySchema {
    EntitySchema::new(EntityType::User)
        .field(
            "name",
            FieldRule::required(ValueKind::String).max_length(MAX_STRING_LENGTH),
        )
        .field(
            "email",
            FieldRule::required(ValueKind::String)
                .max_length(MAX_STRING_LENGTH)
                .pattern(email_regex().clone())
                .unique(),
        )
        .field(
            "password",
            FieldRule::required_if(on_create, ValueKind::String)
                .min_length(MIN_PASSWORD_LENGTH)
                .max_length(MAX_PASSWORD_LENGTH)
                .preserve_whitespace(),
        )
        .field(
            "password_confirmation",
            FieldRule::required_if(on_create, ValueKind::String)
                .equal_to("password")
                .max_length(MAX_PASSWORD_LENGTH)
                .preserve_whitespace(),
        )
        .field("role", FieldRule::required(ValueKind::String).one_of(Role::VALUES))
}
