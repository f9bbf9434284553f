//! Error types for tagorm

use thiserror::Error;

/// Result type alias for tagorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Boxed error produced by an [`Executor`](crate::Executor) implementation.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for model operations
#[derive(Debug, Error)]
pub enum OrmError {
    /// The operation needs a structured record with named fields
    #[error("needs a struct with named fields: {0}")]
    NotAStruct(&'static str),

    /// Identity-dependent operation on a record type without a `pk` field
    #[error("no primary key field on {0}")]
    NoPrimaryKey(&'static str),

    /// The field is tagged `ignore` and has no column
    #[error("field '{0}' is ignored")]
    FieldIgnored(String),

    /// Raw column bytes could not be converted into the field's numeric type
    #[error("invalid value type for column '{column}': {message}")]
    InvalidType { column: String, message: String },

    /// The field's declared type has no defined conversion from raw bytes
    #[error("unsupported type for column '{column}': {type_name}")]
    UnsupportedType { column: String, type_name: String },

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Error raised by the underlying executor, passed through untouched
    #[error(transparent)]
    Executor(DriverError),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create an invalid-type error for a specific column
    pub fn invalid_type(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidType {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-type error for a specific column
    pub fn unsupported_type(column: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            column: column.into(),
            type_name: type_name.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Wrap a driver error without altering it.
    pub fn executor(err: impl Into<DriverError>) -> Self {
        Self::Executor(err.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error came from the executor
    pub fn is_executor(&self) -> bool {
        matches!(self, Self::Executor(_))
    }

    /// Check if this is a raw-value conversion error (`InvalidType` or `UnsupportedType`)
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::InvalidType { .. } | Self::UnsupportedType { .. })
    }
}
