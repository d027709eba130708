//! Insurance policy schema

use crate::core::entity::EntityType;
use crate::core::validation::vocabulary::{DateOrder, MAX_STRING_LENGTH, References};
use crate::core::validation::{EntitySchema, FieldRule, ValueKind};

pub fn schema() -> EntitySchema {
    EntitySchema::new(EntityType::InsurancePolicy)
        .field(
            "code",
            FieldRule::required(ValueKind::String).max_length(MAX_STRING_LENGTH),
        )
        .field(
            "project_id",
            FieldRule::required(ValueKind::String).check(References(EntityType::Project)),
        )
        .field(
            "insurance_company_id",
            FieldRule::required(ValueKind::String)
                .check(References(EntityType::InsuranceCompany)),
        )
        .field(
            "start_date",
            FieldRule::required(ValueKind::String)
                .check(DateOrder::not_after("end_date", "cannot be after the end date")),
        )
        .field(
            "end_date",
            FieldRule::required(ValueKind::String).check(DateOrder::not_before(
                "start_date",
                "cannot be before the start date",
            )),
        )
        .field(
            "details",
            FieldRule::required(ValueKind::String).max_length(MAX_STRING_LENGTH),
        )
}
