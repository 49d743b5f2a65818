//! Cart operations joined with the catalog.

use crate::ApiError;
use serde::{Deserialize, Serialize};
use storefront_commerce::cart::{price_lines, CartItem, PriceBreakdown};
use storefront_commerce::catalog::Product;
use storefront_commerce::{Currency, ProductId, UserId};
use storefront_store::repos::{CartRepo, ProductRepo};
use tracing::debug;

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
}

/// A cart line with its current product.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Product,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub item_count: i64,
}

#[derive(Clone)]
pub struct CartService {
    carts: CartRepo,
    products: ProductRepo,
    currency: Currency,
}

impl CartService {
    pub fn new(carts: CartRepo, products: ProductRepo, currency: Currency) -> Self {
        Self {
            carts,
            products,
            currency,
        }
    }

    /// The cart with product details. Lines whose product is gone or
    /// deleted are hidden.
    pub async fn get(&self, user_id: &UserId) -> Result<CartView, ApiError> {
        let cart = self.carts.get(user_id).await?;
        let mut items = Vec::with_capacity(cart.items.len());
        for item in cart.items {
            match self.products.get(&item.product_id).await? {
                Some(product) if product.is_active => items.push(CartLineView { item, product }),
                _ => debug!(product_id = %item.product_id, "hiding cart line for missing product"),
            }
        }
        Ok(CartView {
            item_count: items.iter().map(|l| l.item.quantity).sum(),
            items,
        })
    }

    pub async fn add(&self, user_id: &UserId, request: AddToCartRequest) -> Result<CartView, ApiError> {
        let product = self
            .products
            .get(&request.product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;
        if product.out_of_stock {
            return Err(ApiError::Conflict("Product is out of stock".to_string()));
        }

        self.carts
            .update(user_id, |cart| {
                cart.add_item(
                    request.product_id.clone(),
                    request.quantity,
                    request.size.as_str(),
                    request.color.as_str(),
                )
                .map(|_| ())
            })
            .await?;
        self.get(user_id).await
    }

    /// `key` is a line ID or a product ID.
    pub async fn update_quantity(
        &self,
        user_id: &UserId,
        key: &str,
        quantity: i64,
    ) -> Result<CartView, ApiError> {
        self.carts
            .update(user_id, |cart| cart.update_quantity(key, quantity))
            .await?;
        self.get(user_id).await
    }

    pub async fn remove(&self, user_id: &UserId, key: &str) -> Result<CartView, ApiError> {
        self.carts
            .update(user_id, |cart| cart.remove_item(key).map(|_| ()))
            .await?;
        self.get(user_id).await
    }

    pub async fn clear(&self, user_id: &UserId) -> Result<(), ApiError> {
        self.carts.clear(user_id).await?;
        Ok(())
    }

    /// Price the cart at current catalog prices.
    ///
    /// Lines for missing, deleted or out-of-stock products are left out.
    pub async fn summary(&self, user_id: &UserId) -> Result<PriceBreakdown, ApiError> {
        let cart = self.carts.get(user_id).await?;
        let mut lines = Vec::with_capacity(cart.items.len());
        for item in &cart.items {
            match self.products.get(&item.product_id).await? {
                Some(product) if product.is_purchasable() => {
                    lines.push((product.price, item.quantity))
                }
                _ => {}
            }
        }
        Ok(price_lines(lines, self.currency)?)
    }
}
