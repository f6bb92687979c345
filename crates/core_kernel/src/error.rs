//! Core error types used across the system

use thiserror::Error;

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid {kind}: '{value}'")]
    InvalidIdentifier { kind: String, value: String },

    #[error("Missing session attribute: {0}")]
    MissingAttribute(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn invalid_identifier(kind: impl Into<String>, value: impl Into<String>) -> Self {
        CoreError::InvalidIdentifier {
            kind: kind.into(),
            value: value.into(),
        }
    }

    pub fn missing_attribute(key: impl Into<String>) -> Self {
        CoreError::MissingAttribute(key.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }
}
