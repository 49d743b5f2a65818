use crate::{store_key, Store, StoreError};
use storefront_commerce::wishlist::Wishlist;
use storefront_commerce::{CommerceError, UserId};

/// One wishlist per user, keyed by `wishlist:{user}`.
#[derive(Clone)]
pub struct WishlistRepo {
    store: Store,
}

impl WishlistRepo {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn key(user_id: &UserId) -> String {
        store_key!("wishlist", user_id)
    }

    pub async fn get(&self, user_id: &UserId) -> Result<Wishlist, StoreError> {
        Ok(self
            .store
            .get(&Self::key(user_id))
            .await?
            .unwrap_or_else(|| Wishlist::new(user_id.clone())))
    }

    pub async fn update<F>(&self, user_id: &UserId, mut f: F) -> Result<Wishlist, StoreError>
    where
        F: FnMut(&mut Wishlist) -> Result<(), CommerceError>,
    {
        self.store
            .upsert(
                &Self::key(user_id),
                || Wishlist::new(user_id.clone()),
                |list: &mut Wishlist| f(list).map_err(StoreError::from),
            )
            .await
    }
}
