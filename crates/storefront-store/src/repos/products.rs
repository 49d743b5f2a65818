use crate::{store_key, Store, StoreError};
use storefront_commerce::catalog::{Product, StockAdjustment};
use storefront_commerce::{CommerceError, ProductId};

/// Catalog products keyed by `product:{id}`.
///
/// Every change goes through `modify`, a compare-and-swap on the product
/// record, so concurrent decrements of the last unit cannot both succeed.
#[derive(Clone)]
pub struct ProductRepo {
    store: Store,
}

impl ProductRepo {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn key(id: &ProductId) -> String {
        store_key!("product", id)
    }

    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        self.store.get(&Self::key(id)).await
    }

    /// All products, newest first.
    pub async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let mut products: Vec<Product> = self.store.scan("product:").await?;
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    pub async fn insert(&self, product: &Product) -> Result<(), StoreError> {
        product.validate()?;
        self.store.create(&Self::key(&product.id), product).await
    }

    async fn modify<F>(&self, id: &ProductId, mut f: F) -> Result<Product, StoreError>
    where
        F: FnMut(&mut Product) -> Result<(), CommerceError>,
    {
        match self
            .store
            .update(&Self::key(id), |product: &mut Product| {
                f(product).map_err(StoreError::from)
            })
            .await
        {
            Err(StoreError::NotFound(_)) => {
                Err(CommerceError::ProductNotFound(id.to_string()).into())
            }
            other => other,
        }
    }

    /// Apply a recorded stock movement.
    pub async fn apply_adjustment(
        &self,
        adjustment: &StockAdjustment,
    ) -> Result<Product, StoreError> {
        self.modify(&adjustment.product_id, |p| adjustment.apply(p))
            .await
    }

    pub async fn set_stock(&self, id: &ProductId, stock: i64) -> Result<Product, StoreError> {
        self.modify(id, |p| p.set_stock(stock)).await
    }

    /// Atomically edit a product. The result must still validate.
    pub async fn update<F>(&self, id: &ProductId, mut f: F) -> Result<Product, StoreError>
    where
        F: FnMut(&mut Product) -> Result<(), CommerceError>,
    {
        self.modify(id, |p| {
            f(p)?;
            p.touch();
            p.validate()
        })
        .await
    }

    /// Soft delete: the product stays stored but is no longer active.
    pub async fn deactivate(&self, id: &ProductId) -> Result<Product, StoreError> {
        self.modify(id, Product::deactivate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_commerce::catalog::{AdjustmentReason, ProductCategory};
    use storefront_commerce::{Currency, Money};

    fn product(stock: i64) -> Product {
        Product::new(
            "Chanderi Saree",
            ProductCategory::Sarees,
            Money::from_units(2499, Currency::INR),
            "/images/saree.jpg",
            stock,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = ProductRepo::new(Store::in_memory());
        let p = product(3);
        repo.insert(&p).await.unwrap();
        assert_eq!(repo.get(&p.id).await.unwrap().unwrap(), p);
        assert!(matches!(
            repo.insert(&p).await,
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_last_unit_goes_out_of_stock() {
        let repo = ProductRepo::new(Store::in_memory());
        let p = product(1);
        repo.insert(&p).await.unwrap();
        let after = repo
            .apply_adjustment(&StockAdjustment::sale(p.id.clone(), 1))
            .await
            .unwrap();
        assert_eq!(after.stock, 0);
        assert!(after.out_of_stock);
    }

    #[tokio::test]
    async fn test_apply_adjustment() {
        let repo = ProductRepo::new(Store::in_memory());
        let p = product(2);
        repo.insert(&p).await.unwrap();

        let sold = StockAdjustment::sale(p.id.clone(), 2).with_reference("order-1");
        assert!(repo.apply_adjustment(&sold).await.unwrap().out_of_stock);

        let back = StockAdjustment::restock(p.id.clone(), 2, AdjustmentReason::Cancellation);
        assert_eq!(repo.apply_adjustment(&back).await.unwrap().stock, 2);
    }

    #[tokio::test]
    async fn test_decrement_below_zero_fails() {
        let repo = ProductRepo::new(Store::in_memory());
        let p = product(1);
        repo.insert(&p).await.unwrap();
        let result = repo
            .apply_adjustment(&StockAdjustment::sale(p.id.clone(), 2))
            .await;
        assert!(matches!(
            result,
            Err(StoreError::Domain(CommerceError::InsufficientStock { .. }))
        ));
        assert_eq!(repo.get(&p.id).await.unwrap().unwrap().stock, 1);
    }

    #[tokio::test]
    async fn test_missing_product() {
        let repo = ProductRepo::new(Store::in_memory());
        let restock =
            StockAdjustment::restock(ProductId::new("nope"), 1, AdjustmentReason::Compensation);
        let result = repo.apply_adjustment(&restock).await;
        assert!(matches!(
            result,
            Err(StoreError::Domain(CommerceError::ProductNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_invariants() {
        let repo = ProductRepo::new(Store::in_memory());
        let p = product(3);
        repo.insert(&p).await.unwrap();

        let renamed = repo
            .update(&p.id, |product| {
                product.name = "Banarasi Saree".to_string();
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(renamed.name, "Banarasi Saree");
        assert!(renamed.updated_at >= p.updated_at);

        let result = repo
            .update(&p.id, |product| {
                product.name = "  ".to_string();
                Ok(())
            })
            .await;
        assert!(matches!(
            result,
            Err(StoreError::Domain(CommerceError::Validation(_)))
        ));
        assert_eq!(repo.get(&p.id).await.unwrap().unwrap().name, "Banarasi Saree");
    }

    #[tokio::test]
    async fn test_deactivate() {
        let repo = ProductRepo::new(Store::in_memory());
        let p = product(3);
        repo.insert(&p).await.unwrap();
        assert!(!repo.deactivate(&p.id).await.unwrap().is_active);
        assert!(matches!(
            repo.deactivate(&p.id).await,
            Err(StoreError::Domain(CommerceError::ProductNotFound(_)))
        ));
        assert!(matches!(
            repo.deactivate(&ProductId::new("nope")).await,
            Err(StoreError::Domain(CommerceError::ProductNotFound(_)))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_buyers_of_last_unit() {
        let repo = ProductRepo::new(Store::in_memory());
        let p = product(1);
        repo.insert(&p).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..6 {
            let repo = repo.clone();
            let id = p.id.clone();
            handles.push(tokio::spawn(async move {
                repo.apply_adjustment(&StockAdjustment::sale(id, 1)).await
            }));
        }
        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(repo.get(&p.id).await.unwrap().unwrap().stock, 0);
    }
}
