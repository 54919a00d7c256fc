//! # Error Types
//!
//! Domain-specific error types for kawuz-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kawuz-core errors (this file)                                         │
//! │  ├── CoreError        - Parsing / domain rule failures                 │
//! │  └── ValidationError  - Client-side input checks (CAPTCHA, forms)      │
//! │                                                                         │
//! │  kawuz-client errors (separate crate)                                  │
//! │  └── ClientError      - Network, HTTP status, NotFound, Validation     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → Notice (rendered)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Display texts are shown to the user as-is, so they name the offending
//! field or input.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core storefront logic errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A decimal amount could not be parsed.
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    /// A product id could not be parsed (e.g. from a deep link).
    #[error("Invalid product id: {0}")]
    InvalidProductId(String),

    /// Unknown theme name.
    #[error("Unknown theme '{0}', expected light or dark")]
    UnknownTheme(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur before any network call is made; they never leave the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., email without '@').
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The CAPTCHA answer did not match.
    #[error("Wrong answer to {question}")]
    CaptchaMismatch { question: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
