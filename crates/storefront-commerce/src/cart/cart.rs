//! Cart and cart line types.

use crate::checkout::OrderLineItem;
use crate::error::CommerceError;
use crate::ids::{LineItemId, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// A user's shopping cart.
///
/// Lines reference products by ID only; prices are read from the catalog
/// whenever the cart is priced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty cart for a user.
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a product variant to the cart.
    ///
    /// A line with the same product, size and color has its quantity
    /// increased instead of a second line being added.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        quantity: i64,
        size: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<LineItemId, CommerceError> {
        validate_quantity(quantity)?;
        let size = size.into();
        let color = color.into();

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.matches(&product_id, &size, &color))
        {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            validate_quantity(new_quantity)?;
            existing.quantity = new_quantity;
            self.updated_at = Utc::now();
            return Ok(existing.id.clone());
        }

        let item = CartItem::new(product_id, quantity, size, color);
        let id = item.id.clone();
        self.items.push(item);
        self.updated_at = Utc::now();
        Ok(id)
    }

    /// Set the quantity of a line, addressed by line ID or product ID.
    pub fn update_quantity(&mut self, key: &str, quantity: i64) -> Result<(), CommerceError> {
        validate_quantity(quantity)?;
        let index = self
            .position(key)
            .ok_or_else(|| CommerceError::ItemNotInCart(key.to_string()))?;
        self.items[index].quantity = quantity;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Remove a line, addressed by line ID or product ID.
    pub fn remove_item(&mut self, key: &str) -> Result<CartItem, CommerceError> {
        let index = self
            .position(key)
            .ok_or_else(|| CommerceError::ItemNotInCart(key.to_string()))?;
        self.updated_at = Utc::now();
        Ok(self.items.remove(index))
    }

    /// Remove the line for an exact product variant, if present.
    pub fn remove_variant(&mut self, product_id: &ProductId, size: &str, color: &str) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| !i.matches(product_id, size, color));
        let removed = self.items.len() < len_before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Drop every line that was turned into an order line.
    ///
    /// Returns the number of lines removed.
    pub fn remove_ordered(&mut self, ordered: &[OrderLineItem]) -> usize {
        let len_before = self.items.len();
        self.items.retain(|line| {
            !ordered
                .iter()
                .any(|o| line.matches(&o.product_id, &o.size, &o.color))
        });
        let removed = len_before - self.items.len();
        if removed > 0 {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = Utc::now();
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.id.as_str() == key)
            .or_else(|| self.items.iter().position(|i| i.product_id.as_str() == key))
    }
}

/// One product variant in a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: LineItemId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub size: String,
    pub color: String,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn new(
        product_id: ProductId,
        quantity: i64,
        size: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: LineItemId::generate(),
            product_id,
            quantity,
            size: size.into(),
            color: color.into(),
            added_at: Utc::now(),
        }
    }

    /// Check whether this line is for the given variant.
    pub fn matches(&self, product_id: &ProductId, size: &str, color: &str) -> bool {
        &self.product_id == product_id && self.size == size && self.color == color
    }
}

fn validate_quantity(quantity: i64) -> Result<(), CommerceError> {
    if quantity < 1 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> Cart {
        Cart::new(UserId::new("user-1"))
    }

    #[test]
    fn test_cart_creation() {
        let cart = cart();
        assert!(cart.is_empty());
        assert_eq!(cart.user_id.as_str(), "user-1");
    }

    #[test]
    fn test_add_item() {
        let mut cart = cart();
        cart.add_item(ProductId::new("P1"), 2, "M", "Red").unwrap();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.items.len(), 1);
    }

    #[test]
    fn test_same_variant_merges() {
        let mut cart = cart();
        let first = cart.add_item(ProductId::new("P1"), 1, "M", "Red").unwrap();
        let second = cart.add_item(ProductId::new("P1"), 2, "M", "Red").unwrap();
        assert_eq!(first, second);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_different_size_is_separate_line() {
        let mut cart = cart();
        cart.add_item(ProductId::new("P1"), 1, "M", "Red").unwrap();
        cart.add_item(ProductId::new("P1"), 1, "L", "Red").unwrap();
        assert_eq!(cart.items.len(), 2);
    }

    #[test]
    fn test_update_quantity_by_line_or_product_id() {
        let mut cart = cart();
        let line = cart.add_item(ProductId::new("P1"), 1, "M", "Red").unwrap();

        cart.update_quantity(line.as_str(), 5).unwrap();
        assert_eq!(cart.item_count(), 5);

        cart.update_quantity("P1", 2).unwrap();
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_update_quantity_rejects_zero() {
        let mut cart = cart();
        cart.add_item(ProductId::new("P1"), 1, "M", "Red").unwrap();
        assert_eq!(
            cart.update_quantity("P1", 0),
            Err(CommerceError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_update_missing_line() {
        let mut cart = cart();
        assert!(matches!(
            cart.update_quantity("nope", 1),
            Err(CommerceError::ItemNotInCart(_))
        ));
    }

    #[test]
    fn test_remove_item() {
        let mut cart = cart();
        cart.add_item(ProductId::new("P1"), 1, "M", "Red").unwrap();
        let removed = cart.remove_item("P1").unwrap();
        assert_eq!(removed.product_id.as_str(), "P1");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_variant() {
        let mut cart = cart();
        cart.add_item(ProductId::new("P1"), 1, "M", "Red").unwrap();
        cart.add_item(ProductId::new("P2"), 1, "S", "Blue").unwrap();
        assert!(cart.remove_variant(&ProductId::new("P1"), "M", "Red"));
        assert!(!cart.remove_variant(&ProductId::new("P2"), "M", "Blue"));
        assert_eq!(cart.items.len(), 1);
    }

    #[test]
    fn test_remove_ordered_keeps_other_variants() {
        use crate::money::{Currency, Money};

        let mut cart = cart();
        cart.add_item(ProductId::new("P1"), 1, "M", "Red").unwrap();
        cart.add_item(ProductId::new("P1"), 1, "L", "Red").unwrap();
        cart.add_item(ProductId::new("P2"), 2, "S", "Blue").unwrap();

        let ordered = vec![OrderLineItem {
            product_id: ProductId::new("P1"),
            name: "Kurta".to_string(),
            price: Money::from_units(100, Currency::INR),
            image: String::new(),
            size: "M".to_string(),
            color: "Red".to_string(),
            quantity: 1,
        }];
        assert_eq!(cart.remove_ordered(&ordered), 1);
        assert_eq!(cart.items.len(), 2);
        assert!(cart.items.iter().all(|i| !(i.product_id.as_str() == "P1" && i.size == "M")));
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = cart();
        let result = cart.add_item(ProductId::new("P1"), MAX_QUANTITY_PER_ITEM + 1, "M", "Red");
        assert!(matches!(
            result,
            Err(CommerceError::QuantityExceedsLimit(_, _))
        ));
    }

    #[test]
    fn test_clear() {
        let mut cart = cart();
        cart.add_item(ProductId::new("P1"), 1, "M", "Red").unwrap();
        cart.clear();
        assert!(cart.is_empty());
    }
}
