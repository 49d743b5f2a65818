//! Product catalog module.
//!
//! Contains the product type and stock adjustments.

mod product;
mod stock;

pub use product::{Product, ProductCategory, ProductColor, MAX_NAME_LENGTH};
pub use stock::{AdjustmentReason, StockAdjustment};
