//! Stock adjustment records.

use crate::ids::ProductId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason for a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    /// Units sold on an order.
    Sale,
    /// Units returned because an order was cancelled.
    Cancellation,
    /// Units put back after a failed order placement.
    Compensation,
    /// Administrative overwrite.
    Correction,
}

impl AdjustmentReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentReason::Sale => "sale",
            AdjustmentReason::Cancellation => "cancellation",
            AdjustmentReason::Compensation => "compensation",
            AdjustmentReason::Correction => "correction",
        }
    }
}

/// A change to one product's stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustment {
    /// Product that was adjusted.
    pub product_id: ProductId,
    /// Change in quantity (negative for sales).
    pub quantity_change: i64,
    /// Reason for the adjustment.
    pub reason: AdjustmentReason,
    /// Reference ID (e.g., order ID).
    pub reference_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl StockAdjustment {
    pub fn new(product_id: ProductId, quantity_change: i64, reason: AdjustmentReason) -> Self {
        Self {
            product_id,
            quantity_change,
            reason,
            reference_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Units leaving stock for an order.
    pub fn sale(product_id: ProductId, quantity: i64) -> Self {
        Self::new(product_id, -quantity, AdjustmentReason::Sale)
    }

    /// Units returning to stock.
    pub fn restock(product_id: ProductId, quantity: i64, reason: AdjustmentReason) -> Self {
        Self::new(product_id, quantity, reason)
    }

    pub fn with_reference(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    /// Apply this adjustment to a product.
    pub fn apply(&self, product: &mut super::Product) -> Result<(), crate::CommerceError> {
        if self.quantity_change < 0 {
            product.try_decrement(-self.quantity_change)
        } else {
            product.restore(self.quantity_change)
        }
    }
}
