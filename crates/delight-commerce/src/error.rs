//! Commerce error types.

use crate::money::Money;
use thiserror::Error;

/// Errors that can occur in commerce domain operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Invalid quantity (must be at least 1).
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A price may not be negative.
    #[error("Negative price: {0}")]
    NegativePrice(Money),

    /// The discounted price may never exceed the original price.
    #[error("Discount price {discount} exceeds original price {original}")]
    DiscountExceedsPrice { discount: Money, original: Money },

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}
