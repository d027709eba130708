//! Entity schema: the ordered attribute → rule mapping for one entity type

use super::rule::FieldRule;
use crate::core::entity::EntityType;
use indexmap::IndexMap;

/// Ordered set of field rules for one entity type
///
/// Declaration order decides the order of reported errors; it has no
/// effect on which checks run.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    entity: EntityType,
    rules: IndexMap<&'static str, FieldRule>,
}

impl EntitySchema {
    pub fn new(entity: EntityType) -> Self {
        Self {
            entity,
            rules: IndexMap::new(),
        }
    }

    /// Declare an attribute
    ///
    /// Re-declaring an attribute replaces its rule and keeps its position.
    pub fn field(mut self, attribute: &'static str, rule: FieldRule) -> Self {
        self.rules.insert(attribute, rule);
        self
    }

    pub fn entity(&self) -> EntityType {
        self.entity
    }

    pub fn rule(&self, attribute: &str) -> Option<&FieldRule> {
        self.rules.get(attribute)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.rules.contains_key(attribute)
    }

    /// Attribute names in declaration order
    pub fn attributes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldRule)> {
        self.rules.iter().map(|(name, rule)| (*name, rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
