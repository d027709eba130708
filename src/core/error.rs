//! Typed error handling for the payroll backend
//!
//! Every failure a handler can surface is one variant of [`PayrollError`].
//! Each category knows its HTTP status and a stable error code, so the axum
//! layer can turn any error into a response without inspecting messages.
//!
//! # Error Categories
//!
//! - [`EntityError`]: unknown entity types and missing records
//! - [`ValidationError`]: rejected payloads (field errors, malformed JSON)
//! - [`StorageError`]: record store faults (fatal, never user-triggered)
//! - [`ConfigError`]: configuration loading and validation
//! - [`RequestError`]: authentication, authorization, malformed requests,
//!   deletes of referenced records
//!
//! Field-level validation failures are rendered in the wire shape clients
//! already rely on:
//!
//! ```json
//! { "errors": [ { "attribute": "email", "message": "is already in use" } ] }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The main error type for the payroll backend
#[derive(Debug)]
pub enum PayrollError {
    /// Entity-related errors (unknown type, missing record)
    Entity(EntityError),

    /// Validation errors
    Validation(ValidationError),

    /// Record store errors
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// HTTP/Request errors
    Request(RequestError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for PayrollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayrollError::Entity(e) => write!(f, "{}", e),
            PayrollError::Validation(e) => write!(f, "{}", e),
            PayrollError::Storage(e) => write!(f, "{}", e),
            PayrollError::Config(e) => write!(f, "{}", e),
            PayrollError::Request(e) => write!(f, "{}", e),
            PayrollError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for PayrollError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PayrollError::Entity(e) => Some(e),
            PayrollError::Validation(e) => Some(e),
            PayrollError::Storage(e) => Some(e),
            PayrollError::Config(e) => Some(e),
            PayrollError::Request(e) => Some(e),
            PayrollError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl PayrollError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::Entity(e) => e.status_code(),
            PayrollError::Validation(e) => e.status_code(),
            PayrollError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PayrollError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PayrollError::Request(e) => e.status_code(),
            PayrollError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            PayrollError::Entity(e) => e.error_code(),
            PayrollError::Validation(e) => e.error_code(),
            PayrollError::Storage(_) => "STORAGE_ERROR",
            PayrollError::Config(_) => "CONFIG_ERROR",
            PayrollError::Request(e) => e.error_code(),
            PayrollError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            PayrollError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id
                }))
            }
            _ => None,
        }
    }

    /// Shorthand for a not-found record
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        PayrollError::Entity(EntityError::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        })
    }
}

impl IntoResponse for PayrollError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            PayrollError::Validation(ValidationError::FieldErrors(errors)) => {
                (status, Json(serde_json::json!({ "errors": errors }))).into_response()
            }
            other => {
                if status.is_server_error() {
                    tracing::error!(code = other.error_code(), error = %other, "request failed");
                }
                (status, Json(other.to_response())).into_response()
            }
        }
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity types and records
#[derive(Debug)]
pub enum EntityError {
    /// Record was not found
    NotFound { entity_type: String, id: String },

    /// Entity type is not registered
    UnknownType { entity_type: String },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
            EntityError::UnknownType { entity_type } => {
                write!(f, "Unknown entity type: {}", entity_type)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            // Unregistered types are programming errors, not client mistakes
            EntityError::UnknownType { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::UnknownType { .. } => "UNKNOWN_ENTITY_TYPE",
        }
    }
}

impl From<EntityError> for PayrollError {
    fn from(err: EntityError) -> Self {
        PayrollError::Entity(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single rejected attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub attribute: String,
    pub message: String,
}

impl FieldError {
    pub fn new(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// One or more attributes were rejected
    FieldErrors(Vec<FieldError>),

    /// Invalid JSON format
    InvalidJson { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{} {}", e.attribute, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::FieldErrors(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationError::InvalidJson { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
        }
    }
}

impl From<ValidationError> for PayrollError {
    fn from(err: ValidationError) -> Self {
        PayrollError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by a record store
#[derive(Debug)]
pub enum StorageError {
    /// Failed to connect to the backend
    ConnectionError { backend: String, message: String },

    /// A lookup or write failed
    QueryError {
        entity_type: String,
        operation: String,
        message: String,
    },
}

impl StorageError {
    /// Wrap a backend failure for one store operation
    pub fn query(entity_type: impl fmt::Display, operation: &str, err: anyhow::Error) -> Self {
        StorageError::QueryError {
            entity_type: entity_type.to_string(),
            operation: operation.to_string(),
            message: format!("{:#}", err),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::QueryError {
                entity_type,
                operation,
                message,
            } => {
                write!(f, "Failed to {} {}: {}", operation, entity_type, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for PayrollError {
    fn from(err: StorageError) -> Self {
        PayrollError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue { field: String, message: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{}': {}", field, message)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for PayrollError {
    fn from(err: ConfigError) -> Self {
        PayrollError::Config(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug)]
pub enum RequestError {
    /// Invalid request body
    InvalidBody { message: String },

    /// Missing or invalid credentials
    Unauthorized { message: String },

    /// Authenticated, but the role is not allowed
    Forbidden { message: String },

    /// The record is still referenced by another record
    Conflict { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
            RequestError::Unauthorized { message } => {
                write!(f, "Unauthorized: {}", message)
            }
            RequestError::Forbidden { message } => {
                write!(f, "Forbidden: {}", message)
            }
            RequestError::Conflict { message } => {
                write!(f, "Conflict: {}", message)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RequestError::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::Forbidden { .. } => "FORBIDDEN",
            RequestError::Conflict { .. } => "CONFLICT",
        }
    }
}

impl From<RequestError> for PayrollError {
    fn from(err: RequestError) -> Self {
        PayrollError::Request(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for PayrollError {
    fn from(err: serde_json::Error) -> Self {
        PayrollError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for PayrollError {
    fn from(err: std::io::Error) -> Self {
        PayrollError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for PayrollError {
    fn from(err: serde_yaml::Error) -> Self {
        PayrollError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for payroll operations
pub type PayrollResult<T> = Result<T, PayrollError>;
