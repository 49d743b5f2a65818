use crate::{store_key, Store, StoreError};
use storefront_commerce::cart::Cart;
use storefront_commerce::{CommerceError, UserId};

/// One cart per user, keyed by `cart:{user}`.
#[derive(Clone)]
pub struct CartRepo {
    store: Store,
}

impl CartRepo {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn key(user_id: &UserId) -> String {
        store_key!("cart", user_id)
    }

    /// The user's cart, empty if none was saved yet.
    pub async fn get(&self, user_id: &UserId) -> Result<Cart, StoreError> {
        Ok(self
            .store
            .get(&Self::key(user_id))
            .await?
            .unwrap_or_else(|| Cart::new(user_id.clone())))
    }

    pub async fn update<F>(&self, user_id: &UserId, mut f: F) -> Result<Cart, StoreError>
    where
        F: FnMut(&mut Cart) -> Result<(), CommerceError>,
    {
        self.store
            .upsert(
                &Self::key(user_id),
                || Cart::new(user_id.clone()),
                |cart: &mut Cart| f(cart).map_err(StoreError::from),
            )
            .await
    }

    pub async fn clear(&self, user_id: &UserId) -> Result<Cart, StoreError> {
        self.update(user_id, |cart| {
            cart.clear();
            Ok(())
        })
        .await
    }
}
