//! # Error Types
//!
//! Structured error types for rebar_core. Nothing in this crate is fatal:
//! every variant describes a condition the caller can render as a
//! placeholder and carry on from.
//!
//! ## Example
//!
//! ```rust
//! use rebar_core::errors::{CalcError, CalcResult};
//!
//! fn validate_spacing(spacing_mm: f64) -> CalcResult<()> {
//!     if spacing_mm <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "spacing_mm".to_string(),
//!             value: spacing_mm.to_string(),
//!             reason: "Spacing must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for rebar_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for lookups, derivations and catalog loading.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A user-supplied value is non-numeric, non-integral or not strictly positive
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A catalog row is missing its key column
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Key not present in a reference table or catalog
    #[error("No {catalog} record for '{key}'")]
    RecordNotFound { catalog: String, key: String },

    /// A catalog's backing source could not be read
    #[error("Source unavailable: '{path}' - {reason}")]
    SourceUnavailable { path: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a RecordNotFound error
    pub fn record_not_found(catalog: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::RecordNotFound {
            catalog: catalog.into(),
            key: key.into(),
        }
    }

    /// Create a SourceUnavailable error
    pub fn source_unavailable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::SourceUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if the session can simply continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::MissingField { .. }
                | CalcError::RecordNotFound { .. }
                | CalcError::SourceUnavailable { .. }
        )
    }

    /// Check if this error means "no data" rather than bad input
    pub fn is_absent(&self) -> bool {
        matches!(self, CalcError::RecordNotFound { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            CalcError::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}
