//! Per-user wishlist.

use crate::error::CommerceError;
use crate::ids::{ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Products a user has saved for later, in the order they were added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    pub user_id: UserId,
    pub items: Vec<ProductId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wishlist {
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.contains(product_id)
    }

    /// Save a product. Saving twice is an error.
    pub fn add(&mut self, product_id: ProductId) -> Result<(), CommerceError> {
        if self.contains(&product_id) {
            return Err(CommerceError::AlreadyInWishlist(product_id.into_inner()));
        }
        self.items.push(product_id);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn remove(&mut self, product_id: &ProductId) -> Result<(), CommerceError> {
        let index = self
            .items
            .iter()
            .position(|p| p == product_id)
            .ok_or_else(|| CommerceError::NotInWishlist(product_id.to_string()))?;
        self.items.remove(index);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Add the product if absent, remove it if present.
    ///
    /// Returns whether the product is saved afterwards.
    pub fn toggle(&mut self, product_id: ProductId) -> bool {
        if self.contains(&product_id) {
            self.items.retain(|p| p != &product_id);
            self.updated_at = Utc::now();
            false
        } else {
            self.items.push(product_id);
            self.updated_at = Utc::now();
            true
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wishlist() -> Wishlist {
        Wishlist::new(UserId::new("user-1"))
    }

    #[test]
    fn test_add_and_contains() {
        let mut list = wishlist();
        list.add(ProductId::new("P1")).unwrap();
        assert!(list.contains(&ProductId::new("P1")));
    }

    #[test]
    fn test_add_duplicate_fails() {
        let mut list = wishlist();
        list.add(ProductId::new("P1")).unwrap();
        assert!(matches!(
            list.add(ProductId::new("P1")),
            Err(CommerceError::AlreadyInWishlist(_))
        ));
        assert_eq!(list.items.len(), 1);
    }

    #[test]
    fn test_remove_missing_fails() {
        let mut list = wishlist();
        assert!(matches!(
            list.remove(&ProductId::new("P1")),
            Err(CommerceError::NotInWishlist(_))
        ));
    }

    #[test]
    fn test_toggle() {
        let mut list = wishlist();
        assert!(list.toggle(ProductId::new("P1")));
        assert!(!list.toggle(ProductId::new("P1")));
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut list = wishlist();
        list.add(ProductId::new("P1")).unwrap();
        list.add(ProductId::new("P2")).unwrap();
        list.clear();
        assert!(list.items.is_empty());
    }
}
