//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer token on the request.
    #[error("Not authorized, no token")]
    MissingToken,

    /// Token malformed or signature mismatch.
    #[error("Not authorized, token failed")]
    InvalidToken,

    /// Token expired.
    #[error("Not authorized, token expired")]
    TokenExpired,

    /// Token is fine but the account is gone or disabled.
    #[error("Not authorized, user not found")]
    UserNotFound,

    /// Insufficient permissions.
    #[error("Not authorized as an admin")]
    InsufficientPermissions,

    /// Password too weak.
    #[error("{0}")]
    WeakPassword(String),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}
