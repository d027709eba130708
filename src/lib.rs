//! # payroll
//!
//! A role-gated REST backend for payroll and HR record-keeping: employees,
//! projects, positions, insurance, subcontracts, weekly payroll entries,
//! and staff users.
//!
//! ## Features
//!
//! - **Declarative validation**: one ordered schema of field rules per entity
//!   type, applied by a single engine on every create and update
//! - **Cross-record checks**: uniqueness, references, and pay-band rules that
//!   consult the record store
//! - **Pluggable storage**: in-memory by default, MySQL behind the `mysql`
//!   feature
//! - **Role-gated CRUD**: JWT bearer tokens resolved to staff roles
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use payroll::prelude::*;
//!
//! let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
//! let engine = ValidationEngine::new(Arc::new(SchemaRegistry::standard()), store);
//!
//! let outcome = engine
//!     .validate(EntityType::Position, true, payload, &Actor::Anonymous, None)
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod schemas;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{Actor, AuthPolicy, Role},
        entity::{EntityType, MaritalStatus, Record, Sex},
        error::{FieldError, PayrollError, PayrollResult},
        store::RecordStore,
    };

    // === Validation ===
    pub use crate::core::validation::{
        CheckContext, CustomCheck, EntitySchema, FieldRule, Requiredness, Shape,
        ValidationEngine, ValidationOutcome, ValueKind,
    };
    pub use crate::schemas::SchemaRegistry;

    // === Storage ===
    pub use crate::storage::InMemoryRecordStore;
    #[cfg(feature = "mysql")]
    pub use crate::storage::MysqlRecordStore;

    // === Server ===
    pub use crate::config::AppConfig;
    pub use crate::server::{AppState, ResourceDescriptor, TokenIssuer, build_router};

    // === Re-exports from dependencies ===
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
}
