//! Error types for sqlexp.
//!
//! All fallible operations return [`DbResult`]. Capability lookups that find
//! nothing return `None` rather than an error.

use crate::dialect::Dialect;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Statement execution failed inside the driver. Forwarded unchanged.
    #[error(transparent)]
    Driver(#[from] sqlx::Error),

    #[error("Unsupported value type for {dialect} literal: {type_name}")]
    UnsupportedValueType {
        dialect: Dialect,
        type_name: &'static str,
    },

    #[error("sqlexp/nest: nested transactions not supported")]
    NestedTransactionsUnsupported,

    #[error("sqlexp/nest: not in a transaction")]
    NotInTransaction,

    #[error("Cancelled: {operation}")]
    Cancelled { operation: String },

    #[error("Deadline exceeded: {operation}")]
    DeadlineExceeded { operation: String },

    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl DbError {
    /// Create an unsupported value type error.
    pub fn unsupported_value(dialect: Dialect, type_name: &'static str) -> Self {
        Self::UnsupportedValueType { dialect, type_name }
    }

    /// Create a cancellation error.
    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// Create a deadline error.
    pub fn deadline_exceeded(operation: impl Into<String>) -> Self {
        Self::DeadlineExceeded {
            operation: operation.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// SQLSTATE (or vendor code) reported by the database, if any.
    pub fn sql_state(&self) -> Option<String> {
        match self {
            Self::Driver(sqlx::Error::Database(db_err)) => db_err.code().map(|c| c.to_string()),
            _ => None,
        }
    }

    /// True if the call was stopped by its context rather than by the database.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::DeadlineExceeded { .. })
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;
