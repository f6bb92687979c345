//! Policy domain errors
//!
//! This module defines the error types raised while validating or assembling
//! policy records before they reach the database.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the policy domain
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    /// Required field is missing or blank
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Minimum sum assured exceeds the maximum
    #[error("Sum assured range is inverted: min {min} > max {max}")]
    InvertedSumAssured { min: Decimal, max: Decimal },

    /// Tenure must be a positive, finite number of years
    #[error("Invalid tenure: {0} years")]
    InvalidTenure(f64),

    /// Certificate expiry falls outside the representable calendar
    #[error("Expiry date out of range: {start} + {days} days")]
    DateOutOfRange { start: NaiveDate, days: i64 },

    /// Nominee share must lie in (0, 100]
    #[error("Invalid nominee share: {0}%")]
    InvalidShare(Decimal),

    /// Generic validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl PolicyError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PolicyError::Validation(message.into())
    }

    /// Creates a missing field error
    pub fn missing(field: impl Into<String>) -> Self {
        PolicyError::MissingRequiredField(field.into())
    }
}
