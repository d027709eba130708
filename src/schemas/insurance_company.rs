use crate::core::entity::EntityType;
use crate::core::validation::vocabulary::MAX_STRING_LENGTH;
use crate::core::validation::{EntitySchema, FieldRule, ValueKind};

pub fn schema() -> EntitySchema {
    EntitySchema::new(EntityType::InsuranceCompany)
        .field(
            "code",
            FieldRule::required(ValueKind::String).max_length(MAX_STRING_LENGTH),
        )
        .field(
            "name",
            FieldRule::required(ValueKind::String).max_length(MAX_STRING_LENGTH),
        )
}
