//! # Error Types
//!
//! Structured error types for pricing_core. The calculators themselves never
//! fail: a missing schema is `None` and incomplete input prices at the floor.
//! These errors only surface at the edges of the engine - schema validation,
//! strict selection construction, and catalog file I/O.
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::errors::{PriceError, PriceResult};
//!
//! fn validate_quantity(quantity: i32) -> PriceResult<()> {
//!     if quantity < 1 {
//!         return Err(PriceError::InvalidInput {
//!             field: "quantity".to_string(),
//!             value: quantity.to_string(),
//!             reason: "Quantity must be at least 1".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pricing_core operations
pub type PriceResult<T> = Result<T, PriceError>;

/// Structured error type for pricing operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PriceError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// An option id is not part of the schema
    #[error("Unknown option: '{option_id}'")]
    UnknownOption { option_id: String },

    /// A select/radio value key is not offered by the option
    #[error("Unknown value '{value}' for option '{option_id}'")]
    UnknownValue { option_id: String, value: String },

    /// Selection value does not match the option kind
    #[error("Selection for '{option_id}' expected {expected}, got {actual}")]
    SelectionMismatch {
        option_id: String,
        expected: String,
        actual: String,
    },

    /// Configuration schema is malformed
    #[error("Invalid schema '{schema}': {reason}")]
    InvalidSchema { schema: String, reason: String },

    /// Product category not recognised
    #[error("Category not found: {category}")]
    CategoryNotFound { category: String },

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

    /// Catalog version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl PriceError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        PriceError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownOption error
    pub fn unknown_option(option_id: impl Into<String>) -> Self {
        PriceError::UnknownOption {
            option_id: option_id.into(),
        }
    }

    /// Create an UnknownValue error
    pub fn unknown_value(option_id: impl Into<String>, value: impl Into<String>) -> Self {
        PriceError::UnknownValue {
            option_id: option_id.into(),
            value: value.into(),
        }
    }

    /// Create a SelectionMismatch error
    pub fn selection_mismatch(
        option_id: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        PriceError::SelectionMismatch {
            option_id: option_id.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an InvalidSchema error
    pub fn invalid_schema(schema: impl Into<String>, reason: impl Into<String>) -> Self {
        PriceError::InvalidSchema {
            schema: schema.into(),
            reason: reason.into(),
        }
    }

    /// Create a CategoryNotFound error
    pub fn category_not_found(category: impl Into<String>) -> Self {
        PriceError::CategoryNotFound {
            category: category.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        PriceError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PriceError::InvalidInput { .. } => "INVALID_INPUT",
            PriceError::UnknownOption { .. } => "UNKNOWN_OPTION",
            PriceError::UnknownValue { .. } => "UNKNOWN_VALUE",
            PriceError::SelectionMismatch { .. } => "SELECTION_MISMATCH",
            PriceError::InvalidSchema { .. } => "INVALID_SCHEMA",
            PriceError::CategoryNotFound { .. } => "CATEGORY_NOT_FOUND",
            PriceError::FileError { .. } => "FILE_ERROR",
            PriceError::SerializationError { .. } => "SERIALIZATION_ERROR",
            PriceError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for PriceError {
    fn from(e: serde_json::Error) -> Self {
        PriceError::SerializationError { reason: e.to_string() }
    }
}
