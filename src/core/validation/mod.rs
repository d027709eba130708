//! Model validation
//!
//! Declarative per-field rules grouped into entity schemas, and the engine
//! that applies them to create and update payloads.

pub mod engine;
pub mod extractor;
pub mod filters;
pub mod rule;
pub mod schema;
pub mod vocabulary;

pub use engine::{ValidationEngine, ValidationOutcome};
pub use extractor::{Validated, ValidationTarget};
pub use rule::{
    CheckContext, CustomCheck, FieldRule, KindCheck, Requiredness, RequirednessContext, Shape,
    ValueKind,
};
pub use schema::EntitySchema;
