//! Weekly payroll history schema

use crate::core::entity::EntityType;
use crate::core::validation::vocabulary::{NonNegative, References, ValidDate};
use crate::core::validation::{EntitySchema, FieldRule, ValueKind};

/// Hour and slip amounts, in declaration order
pub const AMOUNT_FIELDS: [&str; 18] = [
    "hours_day_1",
    "hours_day_2",
    "hours_day_3",
    "hours_day_4",
    "hours_day_5",
    "hours_day_6",
    "hours_day_7",
    "slip_regular_hours",
    "slip_overtime_hours",
    "slip_addition_1",
    "slip_addition_2",
    "slip_addition_3",
    "slip_deduction_1",
    "slip_deduction_2",
    "slip_deduction_3",
    "slip_deduction_4",
    "slip_deduction_5",
    "slip_deduction_6",
];

pub fn schema() -> EntitySchema {
    let schema = EntitySchema::new(EntityType::WeeklyPayrollHistory)
        .field(
            "week_start_date",
            FieldRule::required(ValueKind::String).check(ValidDate),
        )
        .field(
            "employee_id",
            FieldRule::required(ValueKind::String).check(References(EntityType::Employee)),
        );

    AMOUNT_FIELDS.into_iter().fold(schema, |schema, field| {
        schema.field(
            field,
            FieldRule::required(ValueKind::Number).check(NonNegative("must be at least 0")),
        )
    })
}
