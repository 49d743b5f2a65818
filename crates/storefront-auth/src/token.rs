//! Signed bearer tokens.
//!
//! A token is `base64url(claims_json) "." base64url(hmac_sha256(payload))`,
//! where the MAC covers the encoded claims.

use crate::AuthError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use storefront_commerce::account::Role;
use storefront_commerce::UserId;

type HmacSha256 = Hmac<Sha256>;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

/// What a token asserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User the token was issued to.
    pub sub: UserId,
    pub role: Role,
    /// Issued at, Unix seconds.
    pub iat: i64,
    /// Expires at, Unix seconds.
    pub exp: i64,
}

/// Issues and verifies tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            ttl,
        }
    }

    /// Signer with a random 32-byte secret. Tokens do not survive a restart.
    pub fn random(ttl: Duration) -> Self {
        use rand::Rng;

        let secret: [u8; 32] = rand::thread_rng().gen();
        Self::new(secret, ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token valid from now for the configured lifetime.
    pub fn issue(&self, user_id: &UserId, role: Role) -> Result<String, AuthError> {
        self.issue_at(user_id, role, Utc::now().timestamp())
    }

    pub fn issue_at(&self, user_id: &UserId, role: Role, now: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.clone(),
            role,
            iat: now,
            exp: now.saturating_add(self.ttl.num_seconds()),
        };
        let json =
            serde_json::to_vec(&claims).map_err(|e| AuthError::Internal(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = URL_SAFE_NO_PAD.encode(self.mac(&payload)?.finalize().into_bytes());
        Ok(format!("{}.{}", payload, signature))
    }

    /// Check signature and expiry and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthError::InvalidToken)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken)?;
        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| AuthError::InvalidToken)?;
        if now >= claims.exp {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, AuthError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }
}
