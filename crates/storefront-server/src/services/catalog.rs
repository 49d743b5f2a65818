//! Product catalog.

use std::path::Path;

use crate::ApiError;
use serde::Deserialize;
use storefront_auth::CurrentUser;
use storefront_commerce::catalog::{Product, ProductCategory, ProductColor};
use storefront_commerce::{CommerceError, Currency, Money, ProductId};
use storefront_store::repos::ProductRepo;
use storefront_store::StoreError;
use tracing::info;

/// Product fields as sent by an admin or read from a seed file.
///
/// Prices are decimal currency units.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: ProductCategory,
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub main_image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<ProductColor>,
    #[serde(default)]
    pub stock: i64,
}

impl NewProduct {
    fn into_product(self, currency: Currency) -> Result<Product, CommerceError> {
        if !self.price.is_finite() {
            return Err(CommerceError::Validation("Please add a price".to_string()));
        }
        let main_image = if self.main_image.is_empty() {
            self.images.first().cloned().unwrap_or_default()
        } else {
            self.main_image
        };
        let mut product = Product::new(
            self.name,
            self.category,
            Money::from_decimal(self.price, currency),
            main_image,
            self.stock,
        )?;
        product.description = self.description;
        product.original_price = self
            .original_price
            .filter(|p| p.is_finite())
            .map(|p| Money::from_decimal(p, currency));
        product.images = self.images;
        product.sizes = self.sizes;
        product.colors = self.colors;
        Ok(product)
    }
}

/// Admin edit of an existing product. Absent fields are kept.
///
/// Sending `images` also moves `mainImage` to the first one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ProductCategory>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub images: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub colors: Option<Vec<ProductColor>>,
    pub stock: Option<i64>,
}

impl ProductUpdate {
    fn apply(&self, product: &mut Product, currency: Currency) -> Result<(), CommerceError> {
        if let Some(name) = &self.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(price) = self.price {
            if !price.is_finite() {
                return Err(CommerceError::Validation(
                    "Price must be a number".to_string(),
                ));
            }
            product.price = Money::from_decimal(price, currency);
        }
        if let Some(original) = self.original_price {
            if !original.is_finite() {
                return Err(CommerceError::Validation(
                    "Original price must be a number".to_string(),
                ));
            }
            product.original_price = Some(Money::from_decimal(original, currency));
        }
        if let Some(images) = &self.images {
            if let Some(first) = images.first() {
                product.main_image = first.clone();
            }
            product.images = images.clone();
        }
        if let Some(sizes) = &self.sizes {
            product.sizes = sizes.clone();
        }
        if let Some(colors) = &self.colors {
            product.colors = colors.clone();
        }
        if let Some(stock) = self.stock {
            product.set_stock(stock)?;
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct CatalogService {
    products: ProductRepo,
    currency: Currency,
}

impl CatalogService {
    pub fn new(products: ProductRepo, currency: Currency) -> Self {
        Self { products, currency }
    }

    /// Active products, newest first.
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        Ok(self
            .products
            .list()
            .await?
            .into_iter()
            .filter(|p| p.is_active)
            .collect())
    }

    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.products
            .get(id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))
    }

    pub async fn create_product(
        &self,
        actor: &CurrentUser,
        input: NewProduct,
    ) -> Result<Product, ApiError> {
        actor.require_admin()?;
        let product = input.into_product(self.currency)?;
        self.products.insert(&product).await?;
        info!(product_id = %product.id, name = %product.name, stock = product.stock, "product created");
        Ok(product)
    }

    /// Set absolute stock. `outOfStock` follows.
    pub async fn update_stock(
        &self,
        actor: &CurrentUser,
        id: &ProductId,
        stock: i64,
    ) -> Result<Product, ApiError> {
        actor.require_admin()?;
        let product = self.products.set_stock(id, stock).await?;
        info!(product_id = %id, stock, by = %actor.id, "stock updated");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        actor: &CurrentUser,
        id: &ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ApiError> {
        actor.require_admin()?;
        self.get_product(id).await?;
        let product = self
            .products
            .update(id, |product| update.apply(product, self.currency))
            .await?;
        info!(product_id = %id, by = %actor.id, "product updated");
        Ok(product)
    }

    /// Take a product off the catalog. It stays stored so past orders and
    /// saved lines still resolve, but it can no longer be listed, carted or
    /// ordered.
    pub async fn delete_product(&self, actor: &CurrentUser, id: &ProductId) -> Result<(), ApiError> {
        actor.require_admin()?;
        self.products.deactivate(id).await.map_err(|e| match e {
            StoreError::Domain(CommerceError::ProductNotFound(_)) => {
                ApiError::NotFound("Product not found".to_string())
            }
            other => other.into(),
        })?;
        info!(product_id = %id, by = %actor.id, "product deleted");
        Ok(())
    }

    /// Categories that have at least one active product, in catalog order.
    pub async fn categories(&self) -> Result<Vec<ProductCategory>, ApiError> {
        let products = self.list_products().await?;
        Ok(ProductCategory::ALL
            .into_iter()
            .filter(|category| products.iter().any(|p| p.category == *category))
            .collect())
    }

    /// Insert every product in a JSON array file. Returns how many were added.
    pub async fn seed_from_file(&self, path: &Path) -> anyhow::Result<usize> {
        use anyhow::Context;

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
        let entries: Vec<NewProduct> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse seed file: {}", path.display()))?;
        self.seed(entries).await
    }

    pub async fn seed(&self, entries: Vec<NewProduct>) -> anyhow::Result<usize> {
        let mut count = 0;
        for entry in entries {
            let name = entry.name.clone();
            let product = entry
                .into_product(self.currency)
                .map_err(|e| anyhow::anyhow!("invalid seed product {:?}: {}", name, e))?;
            self.products
                .insert(&product)
                .await
                .map_err(|e| anyhow::anyhow!("failed to store seed product {:?}: {}", name, e))?;
            count += 1;
        }
        info!(count, "catalog seeded");
        Ok(count)
    }
}
