use crate::core::entity::EntityType;
use crate::core::validation::vocabulary::{MAX_STRING_LENGTH, ValidDate};
use crate::core::validation::{EntitySchema, FieldRule, ValueKind};

fn text() -> FieldRule {
    FieldRule::required(ValueKind::String).max_length(MAX_STRING_LENGTH)
}

pub fn schema() -> EntitySchema {
    EntitySchema::new(EntityType::Project)
        .field("code", text())
        .field("name", text())
        .field("acronym", text())
        .field("accumulation_amount", FieldRule::required(ValueKind::Number))
        .field("address", text())
        .field(
            "end_date",
            FieldRule::required(ValueKind::String).check(ValidDate),
        )
        .field("project_group", text())
        .field(
            "start_date",
            FieldRule::required(ValueKind::String).check(ValidDate),
        )
}
