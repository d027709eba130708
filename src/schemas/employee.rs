//! Employee schema

use crate::core::entity::{EntityType, MaritalStatus, Sex};
use crate::core::validation::vocabulary::{
    BoundedBy, CustomCheckExt, MAX_STRING_LENGTH, NonNegative, PastDate, PayBand, References,
    phone_regex,
};
use crate::core::validation::{EntitySchema, FieldRule, ValueKind};

fn text() -> FieldRule {
    FieldRule::required(ValueKind::String).max_length(MAX_STRING_LENGTH)
}

fn phone() -> FieldRule {
    FieldRule::required(ValueKind::String).pattern(phone_regex().clone())
}

pub fn schema() -> EntitySchema {
    EntitySchema::new(EntityType::Employee)
        .field("code", text())
        .field("name", text())
        .field("address", text())
        .field("phone", phone())
        .field(
            "date_of_birth",
            FieldRule::required(ValueKind::String).check(PastDate),
        )
        .field("sex", FieldRule::required(ValueKind::String).one_of(Sex::VALUES))
        .field(
            "marital_status",
            FieldRule::required(ValueKind::String).one_of(MaritalStatus::VALUES),
        )
        .field("referee", text())
        .field("emergency_name", text())
        .field("emergency_address", text())
        .field("emergency_phone", phone())
        .field(
            "hired_date",
            FieldRule::required(ValueKind::String).check(PastDate),
        )
        .field("skill", text())
        .field(
            "hourly_rate",
            FieldRule::required(ValueKind::Number).check(
                NonNegative("must be higher than 0").then(BoundedBy::at_most(
                    "overtime_rate",
                    "must be lower than overtime rate",
                )),
            ),
        )
        .field(
            "overtime_rate",
            FieldRule::required(ValueKind::Number).check(
                NonNegative("must be higher than 0").then(BoundedBy::at_least(
                    "hourly_rate",
                    "must be higher than hourly rate",
                )),
            ),
        )
        .field(
            "project_id",
            FieldRule::required(ValueKind::String).check(References(EntityType::Project)),
        )
        .field(
            "position_id",
            FieldRule::required(ValueKind::String).check(PayBand {
                hourly: "hourly_rate",
                overtime: "overtime_rate",
            }),
        )
        .field(
            "subcontract_id",
            FieldRule::optional(ValueKind::String).check(References(EntityType::Subcontract)),
        )
}
