//! # Error Types
//!
//! Domain-specific error types for bayou-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bayou-core errors (this file)                                         │
//! │  ├── CoreError        - Settlement / domain errors                     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bayou-reports errors (separate crate)                                 │
//! │  └── ReportError      - Aggregation failures                           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ReportError → API layer           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (category id, field name, etc.)
//! 3. Errors are enum variants, never String
//! 4. Underpaid or overpaid tickets are NOT errors. They are reported as
//!    balance owed / change due on the totals and left to the caller.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Settlement engine errors.
///
/// These errors represent broken references or inputs the engine refuses
/// to compute over. They should be caught and translated to user-facing
/// messages by the API layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line item references a sales category the caller never supplied.
    ///
    /// ## When This Occurs
    /// - Category was deactivated between entry and submission
    /// - Caller assembled the catalog from a stale settings snapshot
    #[error("Sales category not found: {0}")]
    CategoryNotFound(String),

    /// A tender references a payment type the caller never supplied.
    #[error("Payment type not found: {0}")]
    PaymentTypeNotFound(String),

    /// A transaction exceeds the line item limit.
    #[error("Transaction cannot have more than {max} line items")]
    TooManyLineItems { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Bad input is rejected before any computation, never silently coerced:
/// a quantity of zero stays an error, it does not become one.
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

    /// Value must be zero or positive.
    #[error("{field} cannot be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., invalid UUID, undersized ticket number).
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
