use crate::{store_key, Store, StoreError};
use storefront_commerce::account::{normalize_email, ProfileUpdate, User};
use storefront_commerce::UserId;
use tracing::warn;

/// Accounts keyed by `user:{id}`, with unique indexes on email and phone.
#[derive(Clone)]
pub struct UserRepo {
    store: Store,
}

impl UserRepo {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn key(id: &UserId) -> String {
        store_key!("user", id)
    }

    fn email_key(email: &str) -> String {
        store_key!("user-email", normalize_email(email))
    }

    fn phone_key(phone: &str) -> String {
        store_key!("user-phone", phone)
    }

    /// Insert a new account.
    ///
    /// Fails with `AlreadyExists` if the email or phone is taken.
    pub async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let email_key = Self::email_key(&user.email);
        self.store.create(&email_key, &user.id).await?;

        let phone_key = Self::phone_key(&user.phone);
        if let Err(e) = self.store.create(&phone_key, &user.id).await {
            self.release(&email_key).await;
            return Err(e);
        }

        if let Err(e) = self.store.create(&Self::key(&user.id), user).await {
            self.release(&email_key).await;
            self.release(&phone_key).await;
            return Err(e);
        }
        Ok(())
    }

    async fn release(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            warn!(key, error = %e, "failed to release user index entry");
        }
    }

    pub async fn get(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        self.store.get(&Self::key(id)).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        match self.store.get::<UserId>(&Self::email_key(email)).await? {
            Some(id) => self.get(&id).await,
            None => Ok(None),
        }
    }

    /// Apply a normalized profile update, moving the email and phone
    /// indexes along with it.
    ///
    /// Fails with `AlreadyExists` if another account holds the new email or
    /// phone; nothing is changed in that case.
    pub async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<User, StoreError> {
        let key = Self::key(id);
        let current: User = self
            .store
            .get(&key)
            .await?
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;

        let moves = [
            update
                .email
                .as_deref()
                .filter(|email| *email != current.email)
                .map(|email| (Self::email_key(email), Self::email_key(&current.email))),
            update
                .phone
                .as_deref()
                .filter(|phone| *phone != current.phone)
                .map(|phone| (Self::phone_key(phone), Self::phone_key(&current.phone))),
        ];

        let mut claimed: Vec<String> = Vec::new();
        let mut stale = Vec::new();
        for (new_key, old_key) in moves.into_iter().flatten() {
            if let Err(e) = self.store.create(&new_key, id).await {
                for key in &claimed {
                    self.release(key).await;
                }
                return Err(e);
            }
            claimed.push(new_key);
            stale.push(old_key);
        }

        let result = self
            .store
            .update(&key, |user: &mut User| {
                user.apply_profile(update);
                Ok(())
            })
            .await;
        let to_release = if result.is_ok() { &stale } else { &claimed };
        for key in to_release {
            self.release(key).await;
        }
        result
    }

}
