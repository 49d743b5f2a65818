//! Bearer-token authentication.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use storefront_auth::{bearer_token, AuthError, CurrentUser};

use crate::{ApiError, AppState};

/// The authenticated caller.
///
/// Rejects with 401 when the header is missing, the token does not verify,
/// or the account no longer exists. The role is read from the stored
/// account, not the token.
pub struct Auth(pub CurrentUser);

#[async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AuthError::MissingToken)?;

        let claims = state.tokens.verify(token)?;
        let user = state.accounts.current(&claims.sub).await?;
        Ok(Auth(CurrentUser::new(user.id, user.role)))
    }
}
