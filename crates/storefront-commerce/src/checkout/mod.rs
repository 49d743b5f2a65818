//! Checkout module.
//!
//! Contains shipping addresses, payment methods and orders.

mod address;
mod order;
mod payment;

pub use address::ShippingAddress;
pub use order::{
    Order, OrderLineItem, OrderStatus, DELIVERY_ESTIMATE_DAYS, ORDER_NUMBER_PREFIX,
    TRACKING_PREFIX,
};
pub use payment::{PaymentInfo, PaymentMethod};
