//! Wishlist operations joined with the catalog.

use crate::ApiError;
use serde::Serialize;
use storefront_commerce::catalog::Product;
use storefront_commerce::{ProductId, UserId};
use storefront_store::repos::{ProductRepo, WishlistRepo};

#[derive(Debug, Clone, Serialize)]
pub struct WishlistView {
    /// Saved products still on sale, in the order they were saved.
    pub items: Vec<Product>,
}

#[derive(Clone)]
pub struct WishlistService {
    wishlists: WishlistRepo,
    products: ProductRepo,
}

impl WishlistService {
    pub fn new(wishlists: WishlistRepo, products: ProductRepo) -> Self {
        Self {
            wishlists,
            products,
        }
    }

    pub async fn get(&self, user_id: &UserId) -> Result<WishlistView, ApiError> {
        let list = self.wishlists.get(user_id).await?;
        let mut items = Vec::with_capacity(list.items.len());
        for id in &list.items {
            match self.products.get(id).await? {
                Some(product) if product.is_active => items.push(product),
                _ => {}
            }
        }
        Ok(WishlistView { items })
    }

    pub async fn add(&self, user_id: &UserId, product_id: ProductId) -> Result<WishlistView, ApiError> {
        self.require_product(&product_id).await?;
        self.wishlists
            .update(user_id, |list| list.add(product_id.clone()))
            .await?;
        self.get(user_id).await
    }

    pub async fn remove(&self, user_id: &UserId, product_id: &ProductId) -> Result<WishlistView, ApiError> {
        self.wishlists
            .update(user_id, |list| list.remove(product_id))
            .await?;
        self.get(user_id).await
    }

    pub async fn clear(&self, user_id: &UserId) -> Result<(), ApiError> {
        self.wishlists
            .update(user_id, |list| {
                list.clear();
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn contains(&self, user_id: &UserId, product_id: &ProductId) -> Result<bool, ApiError> {
        Ok(self.wishlists.get(user_id).await?.contains(product_id))
    }

    /// Returns whether the product is saved afterwards.
    pub async fn toggle(&self, user_id: &UserId, product_id: ProductId) -> Result<bool, ApiError> {
        self.require_product(&product_id).await?;
        let mut saved = false;
        self.wishlists
            .update(user_id, |list| {
                saved = list.toggle(product_id.clone());
                Ok(())
            })
            .await?;
        Ok(saved)
    }

    async fn require_product(&self, id: &ProductId) -> Result<(), ApiError> {
        match self.products.get(id).await? {
            Some(product) if product.is_active => Ok(()),
            _ => Err(ApiError::NotFound("Product not found".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_commerce::catalog::ProductCategory;
    use storefront_commerce::{Currency, Money};
    use storefront_store::Store;

    async fn setup() -> (WishlistService, ProductRepo, Product) {
        let store = Store::in_memory();
        let products = ProductRepo::new(store.clone());
        let product = Product::new(
            "Traditional Red Banarasi Saree",
            ProductCategory::Sarees,
            Money::from_units(4999, Currency::INR),
            "/images/saree.jpg",
            3,
        )
        .unwrap();
        products.insert(&product).await.unwrap();
        (
            WishlistService::new(WishlistRepo::new(store), products.clone()),
            products,
            product,
        )
    }

    #[tokio::test]
    async fn test_add_check_remove() {
        let (service, _, product) = setup().await;
        let user = UserId::new("user-1");

        let view = service.add(&user, product.id.clone()).await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert!(service.contains(&user, &product.id).await.unwrap());

        let err = service.add(&user, product.id.clone()).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        service.remove(&user, &product.id).await.unwrap();
        assert!(!service.contains(&user, &product.id).await.unwrap());
        let err = service.remove(&user, &product.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_toggle() {
        let (service, _, product) = setup().await;
        let user = UserId::new("user-1");
        assert!(service.toggle(&user, product.id.clone()).await.unwrap());
        assert!(!service.toggle(&user, product.id.clone()).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_product_rejected() {
        let (service, _, _) = setup().await;
        let err = service
            .add(&UserId::new("user-1"), ProductId::new("gone"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_deleted_product_leaves_wishlist() {
        let (service, products, product) = setup().await;
        let user = UserId::new("user-1");
        service.add(&user, product.id.clone()).await.unwrap();
        products.deactivate(&product.id).await.unwrap();

        assert!(service.get(&user).await.unwrap().items.is_empty());
        let err = service.toggle(&user, product.id.clone()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_clear() {
        let (service, _, product) = setup().await;
        let user = UserId::new("user-1");
        service.add(&user, product.id.clone()).await.unwrap();
        service.clear(&user).await.unwrap();
        assert!(service.get(&user).await.unwrap().items.is_empty());
    }
}
