//! # Error Types
//!
//! Domain-specific error types for stockbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockbook-core errors (this file)                                     │
//! │  ├── LedgerError      - The closed taxonomy callers match on           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockbook-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → LedgerError ← DbError (store faults collapse  │
//! │        onto LedgerError::StoreUnavailable)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, available, requested)
//! 3. Errors are enum variants, never String
//! 4. The error kind is the identity; the message is auxiliary data

use thiserror::Error;

// =============================================================================
// Ledger Error
// =============================================================================

/// Failures surfaced by the ledger engine.
///
/// This is a closed taxonomy: callers can match exhaustively and map each
/// kind to a response code. Only [`LedgerError::StoreUnavailable`] is safe to
/// retry automatically - a failed attempt is guaranteed to have left no
/// partial state. The other three require corrected input.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The referenced product does not exist.
    ///
    /// ## When This Occurs
    /// - Movement against an unknown product id
    /// - Product was deleted between lookup and movement
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The movement request is malformed (bad quantity or type shape).
    #[error("Invalid movement: {0}")]
    InvalidMovement(#[from] ValidationError),

    /// The movement would drive the product quantity negative.
    ///
    /// ## Atomicity
    /// When this is returned, no movement was recorded and the quantity is
    /// unchanged - the whole atomic unit rolled back.
    ///
    /// ```text
    /// recordMovement(OUT, 10)
    ///      │
    ///      ▼
    /// quantity = 7, 7 - 10 < 0
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "ABC", available: 7, requested: 10 }
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// The backing store could not complete the atomic unit.
    ///
    /// ## When This Occurs
    /// - Pool exhausted or closed
    /// - Lock acquisition timed out
    /// - I/O failure mid-transaction
    ///
    /// The only retryable kind: callers may safely re-issue the same call.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any store access happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., bad characters in a SKU).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set (e.g., a movement type).
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LedgerError::InsufficientStock {
            sku: "ABC".to_string(),
            available: 7,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for ABC: available 7, requested 10"
        );

        let err = LedgerError::ProductNotFound("p-missing".to_string());
        assert_eq!(err.to_string(), "Product not found: p-missing");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");

        let err = ValidationError::Required {
            field: "productId".to_string(),
        };
        assert_eq!(err.to_string(), "productId is required");
    }

    #[test]
    fn test_validation_converts_to_ledger_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let ledger_err: LedgerError = validation_err.into();
        assert!(matches!(ledger_err, LedgerError::InvalidMovement(_)));
    }
}
