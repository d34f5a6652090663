//! # Error Types
//!
//! Domain-specific error types for pricebook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pricebook-core errors (this file)                                     │
//! │  ├── CoreError        - Ledger rule violations (duplicate, not found)  │
//! │  └── ValidationError  - Input validation and malformed input           │
//! │                                                                         │
//! │  pricebook-io errors (separate crate)                                  │
//! │  └── IoError          - File open/parse/write failures                 │
//! │                                                                         │
//! │  Shell errors (in app)                                                 │
//! │  └── CliError         - What the operator sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → Operator               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant here is recoverable: the operation that produced it left the
//! ledger exactly as it was.

use thiserror::Error;

use crate::types::ProductCode;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing ledger rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Insert of a product code that already has a ledger record.
    ///
    /// ## User Workflow
    /// ```text
    /// add 54520 1.25
    ///      │
    ///      ▼
    /// ledger already holds 54520
    ///      │
    ///      ▼
    /// Duplicate { product_code: 54520 }  (ledger untouched)
    /// ```
    #[error("Product {product_code} is already in the ledger")]
    Duplicate { product_code: ProductCode },

    /// Edit or delete of a product code with no ledger record.
    #[error("Product {product_code} is not in the ledger")]
    NotFound { product_code: ProductCode },

    /// The product code does not exist in the reference catalog.
    #[error("Product {product_code} is not in the catalog")]
    UnknownProduct { product_code: ProductCode },

    /// Fraction pricing requested for a catalog entry without a pack fraction.
    #[error("Product {product_code} has no pack fraction in the catalog")]
    MissingPackFraction { product_code: ProductCode },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// `Malformed` is raised during ingestion when a cell cannot be coerced to the
/// type its column requires (a product code that is not a whole number, a
/// facility code wider than seven digits, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
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

    /// Invalid format (e.g. an unknown pricing mode).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Input cell that cannot be coerced to the expected type.
    #[error("{field} '{value}' is malformed: {reason}")]
    Malformed {
        field: String,
        value: String,
        reason: String,
    },
}

impl ValidationError {
    /// Creates a Malformed error.
    pub fn malformed(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ValidationError::Malformed {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
