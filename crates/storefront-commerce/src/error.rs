//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order not found.
    #[error("Order not found")]
    OrderNotFound(String),

    /// Item not in cart.
    #[error("Item not found in cart")]
    ItemNotInCart(String),

    /// Product is flagged out of stock.
    #[error("Product out of stock: {0}")]
    OutOfStock(String),

    /// Not enough units left to satisfy a decrement.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    /// Stock value below zero.
    #[error("Invalid stock value: {0}")]
    InvalidStock(i64),

    /// Invalid quantity.
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Order status change not permitted by the lifecycle.
    #[error("Cannot change order status from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Order is past the point where it may be cancelled.
    #[error("Order cannot be cancelled at this stage ({0})")]
    CannotCancel(String),

    /// Product already saved.
    #[error("Product already in wishlist")]
    AlreadyInWishlist(String),

    /// Product not saved.
    #[error("Item not found in wishlist")]
    NotInWishlist(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Validation error.
    #[error("{0}")]
    Validation(String),
}

impl CommerceError {
    /// Check if this error means a referenced record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CommerceError::ProductNotFound(_)
                | CommerceError::OrderNotFound(_)
                | CommerceError::ItemNotInCart(_)
                | CommerceError::NotInWishlist(_)
        )
    }

    /// Check if this error is a conflict with current state
    /// (stock, lifecycle, duplicates).
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            CommerceError::OutOfStock(_)
                | CommerceError::InsufficientStock { .. }
                | CommerceError::InvalidStatusTransition { .. }
                | CommerceError::CannotCancel(_)
                | CommerceError::AlreadyInWishlist(_)
        )
    }
}
