//! Shopping cart module.
//!
//! Contains the per-user cart and the pricing engine.

mod cart;
mod pricing;

pub use cart::{Cart, CartItem, MAX_QUANTITY_PER_ITEM};
pub use pricing::{
    price_lines, PriceBreakdown, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, TAX_RATE_PERCENT,
};
