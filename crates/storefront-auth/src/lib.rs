//! Authentication for the storefront.
//!
//! Provides password hashing, signed bearer tokens and the [`CurrentUser`]
//! capability handed to services.

mod error;
mod password;
mod token;
mod user;

pub use error::AuthError;
pub use password::PasswordHasher;
pub use storefront_commerce::account::Role;
pub use token::{Claims, TokenSigner, DEFAULT_TOKEN_TTL_DAYS};
pub use user::CurrentUser;

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }
}
