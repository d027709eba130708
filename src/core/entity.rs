//! Entity types and the shared record representation
//!
//! Every domain record travels through the system as a JSON object
//! ([`Record`]). The [`EntityType`] enum is the only thing that tells
//! records apart: it carries the table name used in URLs and storage, and
//! the singular name used as the request/response envelope key.

use crate::core::error::{EntityError, PayrollError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A stored or candidate record: attribute name to JSON value.
pub type Record = Map<String, Value>;

/// The eight record kinds managed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Employee,
    InsuranceCompany,
    InsurancePolicy,
    Position,
    Project,
    Subcontract,
    User,
    WeeklyPayrollHistory,
}

impl EntityType {
    /// All entity types, in registration order
    pub const ALL: [EntityType; 8] = [
        EntityType::Employee,
        EntityType::InsuranceCompany,
        EntityType::InsurancePolicy,
        EntityType::Position,
        EntityType::Project,
        EntityType::Subcontract,
        EntityType::User,
        EntityType::WeeklyPayrollHistory,
    ];

    /// The plural table name (e.g., "employees", "insurance_companies")
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityType::Employee => "employees",
            EntityType::InsuranceCompany => "insurance_companies",
            EntityType::InsurancePolicy => "insurance_policies",
            EntityType::Position => "positions",
            EntityType::Project => "projects",
            EntityType::Subcontract => "subcontracts",
            EntityType::User => "users",
            EntityType::WeeklyPayrollHistory => "weekly_payroll_histories",
        }
    }

    /// The singular name, used as the JSON envelope key
    pub fn singular(&self) -> &'static str {
        match self {
            EntityType::Employee => "employee",
            EntityType::InsuranceCompany => "insurance_company",
            EntityType::InsurancePolicy => "insurance_policy",
            EntityType::Position => "position",
            EntityType::Project => "project",
            EntityType::Subcontract => "subcontract",
            EntityType::User => "user",
            EntityType::WeeklyPayrollHistory => "weekly_payroll_history",
        }
    }

    /// Attributes of other entity types that hold the id of this one
    ///
    /// A record is not deleted while any of these still points at it.
    pub fn referenced_by(&self) -> &'static [(EntityType, &'static str)] {
        match self {
            EntityType::Project => &[
                (EntityType::Employee, "project_id"),
                (EntityType::InsurancePolicy, "project_id"),
            ],
            EntityType::Position => &[(EntityType::Employee, "position_id")],
            EntityType::Subcontract => &[(EntityType::Employee, "subcontract_id")],
            EntityType::InsuranceCompany => {
                &[(EntityType::InsurancePolicy, "insurance_company_id")]
            }
            EntityType::Employee => &[(EntityType::WeeklyPayrollHistory, "employee_id")],
            EntityType::InsurancePolicy | EntityType::User | EntityType::WeeklyPayrollHistory => {
                &[]
            }
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

impl FromStr for EntityType {
    type Err = PayrollError;

    /// Accepts either the table name or the singular name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|t| t.table_name() == s || t.singular() == s)
            .ok_or_else(|| {
                PayrollError::Entity(EntityError::UnknownType {
                    entity_type: s.to_string(),
                })
            })
    }
}

/// Employee sex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    M,
    F,
    O,
}

impl Sex {
    pub const VALUES: &'static [&'static str] = &["m", "f", "o"];
}

/// Employee marital status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    DeFacto,
    Married,
    Divorced,
    Widowed,
    Other,
}

impl MaritalStatus {
    pub const VALUES: &'static [&'static str] = &[
        "single", "de_facto", "married", "divorced", "widowed", "other",
    ];
}
