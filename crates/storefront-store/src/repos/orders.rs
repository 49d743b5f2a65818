use crate::{store_key, Store, StoreError};
use storefront_commerce::checkout::Order;
use storefront_commerce::{CommerceError, OrderId, UserId};

/// Orders keyed by `order:{id}`.
#[derive(Clone)]
pub struct OrderRepo {
    store: Store,
}

impl OrderRepo {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn key(id: &OrderId) -> String {
        store_key!("order", id)
    }

    pub async fn insert(&self, order: &Order) -> Result<(), StoreError> {
        self.store.create(&Self::key(&order.id), order).await
    }

    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        self.store.get(&Self::key(id)).await
    }

    /// Compare-and-swap update. A missing order fails with `OrderNotFound`.
    pub async fn update<F>(&self, id: &OrderId, mut f: F) -> Result<Order, StoreError>
    where
        F: FnMut(&mut Order) -> Result<(), CommerceError>,
    {
        match self
            .store
            .update(&Self::key(id), |order: &mut Order| {
                f(order).map_err(StoreError::from)
            })
            .await
        {
            Err(StoreError::NotFound(_)) => Err(CommerceError::OrderNotFound(id.to_string()).into()),
            other => other,
        }
    }

    /// A user's orders, newest first.
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|o| o.is_owned_by(user_id))
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    /// Every order, newest first.
    pub async fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self.store.scan("order:").await?;
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use storefront_commerce::cart::price_lines;
    use storefront_commerce::checkout::{
        OrderLineItem, OrderStatus, PaymentMethod, ShippingAddress,
    };
    use storefront_commerce::{Currency, Money, ProductId};

    fn order(user: &str) -> Order {
        let items = vec![OrderLineItem {
            product_id: ProductId::new("P1"),
            name: "Kurta".to_string(),
            price: Money::from_units(100, Currency::INR),
            image: String::new(),
            size: "M".to_string(),
            color: "Red".to_string(),
            quantity: 1,
        }];
        let pricing =
            price_lines(items.iter().map(|i| (i.price, i.quantity)), Currency::INR).unwrap();
        Order::new(
            UserId::new(user),
            items,
            ShippingAddress::new("1 Main", "Pune", "MH", "411001"),
            PaymentMethod::Cod,
            None,
            pricing,
            Currency::INR,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let repo = OrderRepo::new(Store::in_memory());
        let mut older = order("u1");
        older.order_date = older.order_date - Duration::days(1);
        let newer = order("u1");
        let other = order("u2");
        repo.insert(&older).await.unwrap();
        repo.insert(&newer).await.unwrap();
        repo.insert(&other).await.unwrap();

        let listed = repo.list_for_user(&UserId::new("u1")).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[tokio::test]
    async fn test_update_status() {
        let repo = OrderRepo::new(Store::in_memory());
        let o = order("u1");
        repo.insert(&o).await.unwrap();
        let updated = repo
            .update(&o.id, |order| order.apply_status(OrderStatus::Processing))
            .await
            .unwrap();
        assert_eq!(updated.order_status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn test_update_missing_order() {
        let repo = OrderRepo::new(Store::in_memory());
        let result = repo
            .update(&OrderId::new("nope"), |order| order.cancel())
            .await;
        assert!(matches!(
            result,
            Err(StoreError::Domain(CommerceError::OrderNotFound(_)))
        ));
    }
}
