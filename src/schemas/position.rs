//! Position schema
//!
//! The pay band is cross-checked from both ends, so an inverted band
//! reports on both attributes.

use crate::core::entity::EntityType;
use crate::core::validation::vocabulary::{BoundedBy, CustomCheckExt, MAX_STRING_LENGTH, NonNegative};
use crate::core::validation::{EntitySchema, FieldRule, ValueKind};

pub fn schema() -> EntitySchema {
    EntitySchema::new(EntityType::Position)
        .field(
            "code",
            FieldRule::required(ValueKind::String).max_length(MAX_STRING_LENGTH),
        )
        .field(
            "name",
            FieldRule::required(ValueKind::String).max_length(MAX_STRING_LENGTH),
        )
        .field(
            "minimum_pay",
            FieldRule::required(ValueKind::Number).check(
                NonNegative("must be higher than 0").then(BoundedBy::at_most(
                    "maximum_pay",
                    "must be lower than maximum pay",
                )),
            ),
        )
        .field(
            "maximum_pay",
            FieldRule::required(ValueKind::Number).check(
                NonNegative("must be higher than 0").then(BoundedBy::at_least(
                    "minimum_pay",
                    "must be higher than minimum pay",
                )),
            ),
        )
}
