//! Commerce error types.

use crate::ids::ProductId;
use thiserror::Error;

/// Errors that can occur in cart and checkout operations.
///
/// Quantity clamping and guard redirects are not errors; they are reported
/// through return values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Product has no stock, so it cannot be put in the cart.
    #[error("Out of stock: {0}")]
    OutOfStock(ProductId),

    /// Product snapshot carries a negative price.
    #[error("Invalid price for product {0}")]
    InvalidPrice(ProductId),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Pricing configuration is out of range.
    #[error("Invalid pricing rule: {0}")]
    InvalidPricingRule(String),

    /// An order submission is already running.
    #[error("An order is already being placed")]
    SubmissionInFlight,

    /// The order service rejected the order; carries its message verbatim.
    #[error("{0}")]
    SubmissionFailed(String),
}

impl CommerceError {
    /// Whether the user may simply try the same action again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CommerceError::SubmissionFailed(_) | CommerceError::SubmissionInFlight
        )
    }
}
