//! Entity schemas and the registry that serves them
//!
//! One construction function per entity type. Schemas are plain data built
//! once at startup; the engine never mutates them.

pub mod employee;
pub mod insurance_company;
pub mod insurance_policy;
pub mod position;
pub mod project;
pub mod subcontract;
pub mod user;
pub mod weekly_payroll_history;

use crate::core::entity::EntityType;
use crate::core::error::{EntityError, PayrollResult};
use crate::core::validation::EntitySchema;
use std::collections::HashMap;

/// Build the schema for one entity type
pub fn build(entity: EntityType) -> EntitySchema {
    match entity {
        EntityType::Employee => employee::schema(),
        EntityType::InsuranceCompany => insurance_company::schema(),
        EntityType::InsurancePolicy => insurance_policy::schema(),
        EntityType::Position => position::schema(),
        EntityType::Project => project::schema(),
        EntityType::Subcontract => subcontract::schema(),
        EntityType::User => user::schema(),
        EntityType::WeeklyPayrollHistory => weekly_payroll_history::schema(),
    }
}

/// Maps an entity type to its schema
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<EntityType, EntitySchema>,
}

impl SchemaRegistry {
    /// A registry with no schemas
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding the schema of every entity type
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for entity in EntityType::ALL {
            registry.register(build(entity));
        }
        registry
    }

    /// Register a schema, replacing any previous one for the same type
    pub fn register(&mut self, schema: EntitySchema) {
        self.schemas.insert(schema.entity(), schema);
    }

    /// Get the schema for an entity type
    ///
    /// An unregistered type is a programming error, not a user error.
    pub fn schema_for(&self, entity: EntityType) -> PayrollResult<&EntitySchema> {
        self.schemas.get(&entity).ok_or_else(|| {
            EntityError::UnknownType {
                entity_type: entity.to_string(),
            }
            .into()
        })
    }

    /// Get all registered entity types
    pub fn entity_types(&self) -> Vec<EntityType> {
        self.schemas.keys().copied().collect()
    }
}
