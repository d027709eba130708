//! Core types shared by every layer: entity types, the requester, the
//! record store seam, typed errors, credentials, and validation

pub mod auth;
pub mod credentials;
pub mod entity;
pub mod error;
pub mod store;
pub mod validation;

pub use auth::{Actor, AuthPolicy, Role};
pub use entity::{EntityType, Record};
pub use error::{PayrollError, PayrollResult};
pub use store::RecordStore;
