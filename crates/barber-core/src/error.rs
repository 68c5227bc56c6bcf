//! # Error Types
//!
//! Domain-specific error types for barber-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  barber-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Form/query input failures                      │
//! │                                                                         │
//! │  barber-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  web errors (in app)                                                   │
//! │  └── WebError         - What the browser sees (status + page)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → WebError → HTTP response          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Username unknown or password mismatch.
    ///
    /// Deliberately does not say which of the two failed.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The session's role does not allow the operation.
    #[error("Operation requires role {required}")]
    Forbidden { required: String },

    /// CSV encoding or decoding failed.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        CoreError::Csv(err.to_string())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when form or query input doesn't meet requirements and are
/// shown back to the user on the page that submitted them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Monetary value below zero.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Monetary value above the per-field cap.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: Money },

    /// Invalid format (e.g., unparsable date or amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "barbeiro".to_string(),
        };
        assert_eq!(err.to_string(), "barbeiro is required");

        let err = ValidationError::MustBeNonNegative {
            field: "desconto".to_string(),
        };
        assert_eq!(err.to_string(), "desconto must not be negative");

        let err = ValidationError::TooLarge {
            field: "cabelo".to_string(),
            max: Money::from_cents(100_000_000),
        };
        assert_eq!(err.to_string(), "cabelo must be at most 1000000.00");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::TooLong {
            field: "cliente".to_string(),
            max: 120,
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
