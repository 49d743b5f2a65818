//! Order types and the order status lifecycle.

use crate::cart::PriceBreakdown;
use crate::checkout::{PaymentInfo, PaymentMethod, ShippingAddress};
use crate::error::CommerceError;
use crate::ids::{random_upper_alphanumeric, OrderId, ProductId, UserId};
use crate::money::{Currency, Money};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix of human-readable order numbers.
pub const ORDER_NUMBER_PREFIX: &str = "KG";

/// Prefix of generated tracking numbers.
pub const TRACKING_PREFIX: &str = "TRACK";

/// Days between placing an order and its estimated delivery.
pub const DELIVERY_ESTIMATE_DAYS: i64 = 7;

/// Order status.
///
/// ```text
/// pending -> processing -> shipped -> delivered
///    |           |
///    +-----------+--> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Check if order can be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }

    /// Check whether the lifecycle allows moving to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Cancelled)
                | (Processing, Shipped)
                | (Processing, Cancelled)
                | (Shipped, Delivered)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(CommerceError::Validation(format!(
                "Invalid order status: {}",
                other
            ))),
        }
    }
}

/// A line item on an order.
///
/// Name, price and image are copied from the product when the order is
/// created and never change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at time of order.
    pub price: Money,
    pub image: String,
    pub size: String,
    pub color: String,
    pub quantity: i64,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Human-readable order number.
    pub order_number: String,
    pub user_id: UserId,
    pub order_items: Vec<OrderLineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_info: Option<PaymentInfo>,
    pub currency: Currency,
    /// Totals in whole currency units.
    pub items_price: i64,
    pub tax_price: i64,
    pub shipping_price: i64,
    pub total_price: i64,
    pub order_status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Order {
    /// Build a pending order from priced line items.
    pub fn new(
        user_id: UserId,
        order_items: Vec<OrderLineItem>,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
        payment_info: Option<PaymentInfo>,
        pricing: PriceBreakdown,
        currency: Currency,
    ) -> Result<Self, CommerceError> {
        if order_items.is_empty() {
            return Err(CommerceError::Validation("No order items".to_string()));
        }
        if !pricing.is_consistent() {
            return Err(CommerceError::Validation(
                "Order totals do not add up".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: OrderId::generate(),
            order_number: generate_order_number(now),
            user_id,
            order_items,
            shipping_address,
            payment_method,
            payment_info,
            currency,
            items_price: pricing.items_price,
            tax_price: pricing.tax_price,
            shipping_price: pricing.shipping_price,
            total_price: pricing.total_price,
            order_status: OrderStatus::Pending,
            order_date: now,
            updated_at: now,
            estimated_delivery: now + Duration::days(DELIVERY_ESTIMATE_DAYS),
            tracking_number: None,
            delivered_at: None,
            cancelled_at: None,
            notes: None,
        })
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Total number of units ordered.
    pub fn item_count(&self) -> i64 {
        self.order_items.iter().map(|i| i.quantity).sum()
    }

    /// Move the order to `next`, stamping the fields that go with it.
    pub fn apply_status(&mut self, next: OrderStatus) -> Result<(), CommerceError> {
        if !self.order_status.can_transition_to(next) {
            return Err(CommerceError::InvalidStatusTransition {
                from: self.order_status.to_string(),
                to: next.to_string(),
            });
        }
        let now = Utc::now();
        match next {
            OrderStatus::Shipped => {
                self.tracking_number = Some(generate_tracking_number());
            }
            OrderStatus::Delivered => {
                self.delivered_at = Some(now);
            }
            OrderStatus::Cancelled => {
                self.cancelled_at = Some(now);
            }
            OrderStatus::Pending | OrderStatus::Processing => {}
        }
        self.order_status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Cancel on the customer's behalf.
    ///
    /// Only pending and processing orders may be cancelled.
    pub fn cancel(&mut self) -> Result<(), CommerceError> {
        if !self.order_status.can_cancel() {
            return Err(CommerceError::CannotCancel(self.order_status.to_string()));
        }
        self.apply_status(OrderStatus::Cancelled)
    }
}

/// `KG` + epoch millis + 5 random characters.
fn generate_order_number(now: DateTime<Utc>) -> String {
    format!(
        "{}{}{}",
        ORDER_NUMBER_PREFIX,
        now.timestamp_millis(),
        random_upper_alphanumeric(5)
    )
}

fn generate_tracking_number() -> String {
    format!("{}{}", TRACKING_PREFIX, random_upper_alphanumeric(9))
}
