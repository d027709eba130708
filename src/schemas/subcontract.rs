use crate::core::entity::EntityType;
use crate::core::validation::vocabulary::{MAX_STRING_LENGTH, NonNegative};
use crate::core::validation::{EntitySchema, FieldRule, ValueKind};

fn down_payment() -> FieldRule {
    FieldRule::optional(ValueKind::Number).check(NonNegative("must be higher than 0"))
}

pub fn schema() -> EntitySchema {
    EntitySchema::new(EntityType::Subcontract)
        .field(
            "code",
            FieldRule::required(ValueKind::String).max_length(MAX_STRING_LENGTH),
        )
        .field(
            "name",
            FieldRule::required(ValueKind::String).max_length(MAX_STRING_LENGTH),
        )
        .field("down_payment1", down_payment())
        .field("down_payment2", down_payment())
        .field("down_payment3", down_payment())
}
