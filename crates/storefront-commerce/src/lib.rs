//! Storefront domain types and logic.
//!
//! This crate holds everything about the shop that does not touch I/O:
//!
//! - **Accounts**: Customer accounts and roles
//! - **Catalog**: Products, stock levels, stock adjustments
//! - **Cart**: Per-user cart lines and the pricing engine
//! - **Wishlist**: Per-user saved products
//! - **Checkout**: Shipping addresses, payment methods, orders and the
//!   order status state machine
//!
//! # Example
//!
//! ```rust
//! use storefront_commerce::prelude::*;
//!
//! let lines = vec![(Money::from_units(500, Currency::INR), 2)];
//! let pricing = price_lines(lines, Currency::INR).unwrap();
//!
//! assert_eq!(pricing.items_price, 1000);
//! assert_eq!(pricing.tax_price, 180);
//! assert_eq!(pricing.shipping_price, 0);
//! assert_eq!(pricing.total_price, 1180);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod wishlist;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Accounts
    pub use crate::account::{ProfileUpdate, Role, User, UserProfile};

    // Catalog
    pub use crate::catalog::{
        AdjustmentReason, Product, ProductCategory, ProductColor, StockAdjustment,
    };

    // Cart
    pub use crate::cart::{price_lines, Cart, CartItem, PriceBreakdown, MAX_QUANTITY_PER_ITEM};

    // Wishlist
    pub use crate::wishlist::Wishlist;

    // Checkout
    pub use crate::checkout::{
        Order, OrderLineItem, OrderStatus, PaymentInfo, PaymentMethod, ShippingAddress,
    };
}
