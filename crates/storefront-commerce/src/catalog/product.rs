//! Product type and its stock bookkeeping.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a product name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Catalog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductCategory {
    SuitSets,
    Kurtas,
    Dresses,
    Bottoms,
    Sarees,
}

impl ProductCategory {
    /// Every category, in catalog order.
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::SuitSets,
        ProductCategory::Kurtas,
        ProductCategory::Dresses,
        ProductCategory::Bottoms,
        ProductCategory::Sarees,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::SuitSets => "suit-sets",
            ProductCategory::Kurtas => "kurtas",
            ProductCategory::Dresses => "dresses",
            ProductCategory::Bottoms => "bottoms",
            ProductCategory::Sarees => "sarees",
        }
    }
}

/// A named color swatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductColor {
    /// Display name (e.g., "Maroon").
    pub name: String,
    /// CSS value (e.g., "#800000").
    pub value: String,
}

/// A product in the catalog.
///
/// `out_of_stock` is derived from `stock` and is recomputed by every method
/// that touches stock; it is stored so that readers see it in the JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: ProductCategory,
    /// Selling price.
    pub price: Money,
    /// Price before discount, if the product is on sale.
    #[serde(default)]
    pub original_price: Option<Money>,
    pub main_image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<ProductColor>,
    /// Sellable units. Never negative.
    pub stock: i64,
    pub out_of_stock: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// Create a new active product, validating name, price and stock.
    pub fn new(
        name: impl Into<String>,
        category: ProductCategory,
        price: Money,
        main_image: impl Into<String>,
        stock: i64,
    ) -> Result<Self, CommerceError> {
        let now = Utc::now();
        let product = Self {
            id: ProductId::generate(),
            name: name.into(),
            description: String::new(),
            category,
            price,
            original_price: None,
            main_image: main_image.into(),
            images: Vec::new(),
            sizes: Vec::new(),
            colors: Vec::new(),
            stock,
            out_of_stock: stock <= 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        product.validate()?;
        Ok(product)
    }

    /// Check the product's own invariants.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CommerceError::Validation(
                "Please add a product name".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(CommerceError::Validation(format!(
                "Name cannot be more than {} characters",
                MAX_NAME_LENGTH
            )));
        }
        if !self.price.is_positive() {
            return Err(CommerceError::Validation(
                "Price must be greater than zero".to_string(),
            ));
        }
        if self.stock < 0 {
            return Err(CommerceError::InvalidStock(self.stock));
        }
        Ok(())
    }

    /// Check if the product can currently be bought.
    pub fn is_purchasable(&self) -> bool {
        self.is_active && !self.out_of_stock
    }


    /// Overwrite the stock level (administrative update).
    pub fn set_stock(&mut self, stock: i64) -> Result<(), CommerceError> {
        if stock < 0 {
            return Err(CommerceError::InvalidStock(stock));
        }
        self.stock = stock;
        self.touch_stock();
        Ok(())
    }

    /// Take `quantity` units out of stock.
    ///
    /// Fails instead of letting stock go negative.
    pub fn try_decrement(&mut self, quantity: i64) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if quantity > self.stock {
            return Err(CommerceError::InsufficientStock {
                product_id: self.id.to_string(),
                requested: quantity,
                available: self.stock,
            });
        }
        self.stock -= quantity;
        self.touch_stock();
        Ok(())
    }

    /// Put `quantity` units back into stock.
    pub fn restore(&mut self, quantity: i64) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        self.stock = self
            .stock
            .checked_add(quantity)
            .ok_or(CommerceError::Overflow)?;
        self.touch_stock();
        Ok(())
    }

    /// Take the product off sale.
    ///
    /// The record stays so that carts, wishlists and past orders that point
    /// at it still resolve; readers treat it as gone.
    pub fn deactivate(&mut self) -> Result<(), CommerceError> {
        if !self.is_active {
            return Err(CommerceError::ProductNotFound(self.id.to_string()));
        }
        self.is_active = false;
        self.touch();
        Ok(())
    }

    /// Stamp `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn touch_stock(&mut self) {
        self.out_of_stock = self.stock <= 0;
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn kurta(stock: i64) -> Product {
        Product::new(
            "Block Print Kurta",
            ProductCategory::Kurtas,
            Money::from_units(1299, Currency::INR),
            "/images/kurta.jpg",
            stock,
        )
        .unwrap()
    }

    #[test]
    fn test_product_creation() {
        let product = kurta(5);
        assert_eq!(product.stock, 5);
        assert!(!product.out_of_stock);
        assert!(product.is_purchasable());
    }

    #[test]
    fn test_new_product_without_stock_is_out_of_stock() {
        assert!(kurta(0).out_of_stock);
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let result = Product::new(
            "Free Kurta",
            ProductCategory::Kurtas,
            Money::zero(Currency::INR),
            "/images/kurta.jpg",
            1,
        );
        assert!(matches!(result, Err(CommerceError::Validation(_))));
    }

    #[test]
    fn test_decrement_last_unit_marks_out_of_stock() {
        let mut product = kurta(1);
        product.try_decrement(1).unwrap();
        assert_eq!(product.stock, 0);
        assert!(product.out_of_stock);
    }

    #[test]
    fn test_decrement_never_goes_negative() {
        let mut product = kurta(2);
        let err = product.try_decrement(3).unwrap_err();
        assert!(matches!(
            err,
            CommerceError::InsufficientStock {
                requested: 3,
                available: 2,
                ..
            }
        ));
        assert_eq!(product.stock, 2);
    }

    #[test]
    fn test_restore_clears_out_of_stock() {
        let mut product = kurta(0);
        product.restore(2).unwrap();
        assert_eq!(product.stock, 2);
        assert!(!product.out_of_stock);
    }

    #[test]
    fn test_set_stock_rejects_negative() {
        let mut product = kurta(3);
        assert!(product.set_stock(-1).is_err());
        product.set_stock(0).unwrap();
        assert!(product.out_of_stock);
    }

    #[test]
    fn test_deactivate_once() {
        let mut product = kurta(3);
        product.deactivate().unwrap();
        assert!(!product.is_active);
        assert!(!product.is_purchasable());
        assert!(matches!(
            product.deactivate(),
            Err(CommerceError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&ProductCategory::SuitSets).unwrap();
        assert_eq!(json, "\"suit-sets\"");
    }
}
