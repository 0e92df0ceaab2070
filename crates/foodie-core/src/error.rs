//! # Error Types
//!
//! Domain-specific error types for foodie-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  foodie-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Form / input validation failures               │
//! │                                                                         │
//! │  foodie-backend errors (separate crate)                                │
//! │  └── BackendError     - Auth, document and file store failures         │
//! │                                                                         │
//! │  storefront errors (app)                                               │
//! │  └── AppError         - What the screens see                           │
//! │                                                                         │
//! │  Flow: ValidationError → BackendError → AppError → Screen alert        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart has no error type: every cart operation is total.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A monetary amount could not be parsed exactly into minor units.
    ///
    /// ## When This Occurs
    /// - More than two fractional digits (`"10.255"`)
    /// - Exponent notation or non-numeric input from a document
    /// - Amount outside the i64 cent range
    #[error("Invalid money amount '{input}': {reason}")]
    InvalidMoney { input: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub(crate) fn invalid_money(input: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidMoney {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These run before any backend call, so a missing field never costs a
/// network round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::invalid_money("10.255", "at most 2 fractional digits");
        assert_eq!(
            err.to_string(),
            "Invalid money amount '10.255': at most 2 fractional digits"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        };
        assert_eq!(err.to_string(), "password must be at least 8 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
