//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in money and catalog operations.
///
/// Operator-facing rejections (cart adds, override totals, submission
/// checks) have their own reason enums and are not represented here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// A decimal amount could not be parsed.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// A timestamp could not be parsed.
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}
