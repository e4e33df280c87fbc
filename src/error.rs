//! Error types for Podium.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Common error type for Podium.
#[derive(Error, Debug)]
pub enum PodiumError {
    /// Database error.
    ///
    /// Errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Field validation failed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// The operation is not offered by this module.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for PodiumError {
    fn from(e: sqlx::Error) -> Self {
        PodiumError::Database(e.to_string())
    }
}

impl PodiumError {
    /// Field errors carried by a validation failure, if any.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            PodiumError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type alias for Podium operations.
pub type Result<T> = std::result::Result<T, PodiumError>;
