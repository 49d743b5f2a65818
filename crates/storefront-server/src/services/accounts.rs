//! Signup, login and profile management.

use crate::ApiError;
use serde::{Deserialize, Serialize};
use storefront_auth::{AuthError, PasswordHasher, TokenSigner};
use storefront_commerce::account::{normalize_email, ProfileUpdate, Role, User, UserProfile};
use storefront_commerce::UserId;
use storefront_store::repos::UserRepo;
use storefront_store::StoreError;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A freshly issued token and the account it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Clone)]
pub struct AccountService {
    users: UserRepo,
    hasher: PasswordHasher,
    tokens: TokenSigner,
    admin_emails: Vec<String>,
}

impl AccountService {
    pub fn new(
        users: UserRepo,
        hasher: PasswordHasher,
        tokens: TokenSigner,
        admin_emails: &[String],
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            admin_emails: admin_emails.iter().map(|e| normalize_email(e)).collect(),
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<AuthSession, ApiError> {
        PasswordHasher::validate_password(&request.password)?;
        // Validate before paying for the hash.
        let mut user = User::new(&request.name, &request.email, &request.phone, String::new())?;
        user.password_hash = self.hash(request.password).await?;
        if self.admin_emails.contains(&user.email) {
            user.role = Role::Admin;
        }

        match self.users.insert(&user).await {
            Ok(()) => {}
            Err(StoreError::AlreadyExists(_)) => {
                return Err(ApiError::Conflict(
                    "User with this email or phone already exists".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        info!(user_id = %user.id, role = user.role.as_str(), "account created");
        self.session(&user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, ApiError> {
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify(request.password, user.password_hash.clone()).await? {
            warn!(user_id = %user.id, "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "login");
        self.session(&user)
    }

    /// Load the account behind a token. Disabled accounts count as missing.
    pub async fn current(&self, id: &UserId) -> Result<User, ApiError> {
        self.users
            .get(id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    pub async fn me(&self, id: &UserId) -> Result<UserProfile, ApiError> {
        Ok(self.current(id).await?.profile())
    }

    /// Change name, email or phone. Email and phone stay unique across
    /// accounts; the role is never touched.
    pub async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let update = update.normalized()?;
        let user = self.current(id).await?;
        if update.is_empty() {
            return Ok(user.profile());
        }

        match self.users.update_profile(id, &update).await {
            Ok(user) => {
                info!(user_id = %id, "profile updated");
                Ok(user.profile())
            }
            Err(StoreError::AlreadyExists(_)) => Err(ApiError::Conflict(
                "Email or phone already exists".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn session(&self, user: &User) -> Result<AuthSession, ApiError> {
        Ok(AuthSession {
            token: self.tokens.issue(&user.id, user.role)?,
            user: user.profile(),
        })
    }

    async fn hash(&self, password: String) -> Result<String, ApiError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .map_err(ApiError::from)
    }

    async fn verify(&self, password: String, hash: String) -> Result<bool, ApiError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .map_err(ApiError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use storefront_store::Store;

    fn service(admins: &[String]) -> AccountService {
        AccountService::new(
            UserRepo::new(Store::in_memory()),
            PasswordHasher::with_cost(1024, 1).unwrap(),
            TokenSigner::new("test-secret", Duration::days(1)),
            admins,
        )
    }

    fn signup(email: &str, phone: &str) -> SignupRequest {
        SignupRequest {
            name: "Asha Rao".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let accounts = service(&[]);
        let session = accounts.signup(signup("asha@shop.in", "9876543210")).await.unwrap();
        assert_eq!(session.user.role, Role::Customer);
        assert_eq!(session.user.avatar, "AR");

        let login = accounts
            .login(LoginRequest {
                email: "ASHA@shop.in".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(login.user.id, session.user.id);
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let accounts = service(&[]);
        accounts.signup(signup("asha@shop.in", "9876543210")).await.unwrap();
        let err = accounts
            .login(LoginRequest {
                email: "asha@shop.in".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_or_phone_conflicts() {
        let accounts = service(&[]);
        accounts.signup(signup("asha@shop.in", "9876543210")).await.unwrap();

        let err = accounts.signup(signup("asha@shop.in", "9123456789")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        let err = accounts.signup(signup("other@shop.in", "9876543210")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // The rejected signups must not have left their email reserved.
        accounts.signup(signup("other@shop.in", "9000000000")).await.unwrap();
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let accounts = service(&[]);
        let mut request = signup("asha@shop.in", "12345");
        assert!(matches!(
            accounts.signup(request.clone()).await,
            Err(ApiError::Validation(_))
        ));
        request.phone = "9876543210".to_string();
        request.password = "123".to_string();
        assert!(matches!(
            accounts.signup(request).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_profile() {
        let accounts = service(&[]);
        let asha = accounts.signup(signup("asha@shop.in", "9876543210")).await.unwrap();
        accounts.signup(signup("ravi@shop.in", "9123456789")).await.unwrap();

        let profile = accounts
            .update_profile(
                &asha.user.id,
                ProfileUpdate {
                    name: Some("Asha Kumari".to_string()),
                    email: Some("Asha.K@Shop.in".to_string()),
                    phone: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.name, "Asha Kumari");
        assert_eq!(profile.email, "asha.k@shop.in");
        assert_eq!(profile.avatar, "AK");

        // login follows the new email
        accounts
            .login(LoginRequest {
                email: "asha.k@shop.in".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();

        let err = accounts
            .update_profile(
                &asha.user.id,
                ProfileUpdate {
                    phone: Some("9123456789".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "Email or phone already exists"));

        let err = accounts
            .update_profile(
                &asha.user.id,
                ProfileUpdate {
                    email: Some("not-an-email".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_admin_emails_get_admin_role() {
        let accounts = service(&["Owner@Shop.in".to_string()]);
        let session = accounts.signup(signup("owner@shop.in", "9876543210")).await.unwrap();
        assert_eq!(session.user.role, Role::Admin);
    }
}
