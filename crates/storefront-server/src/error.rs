//! API error type and its HTTP mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use storefront_auth::AuthError;
use storefront_commerce::CommerceError;
use storefront_payment::PaymentError;
use storefront_store::StoreError;
use thiserror::Error;
use tracing::error;

/// Errors returned by services and handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Out of stock, lifecycle violations, duplicates.
    #[error("{0}")]
    Conflict(String),

    /// A payment gateway failed; the gateway's message is passed on.
    #[error("{0}")]
    Payment(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Payment(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client.
    fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "Server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(error = %detail, "internal error");
        }
        let body = json!({
            "success": false,
            "message": self.public_message(),
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<CommerceError> for ApiError {
    fn from(err: CommerceError) -> Self {
        let message = err.to_string();
        if err.is_not_found() {
            ApiError::NotFound(message)
        } else if err.is_conflict() {
            ApiError::Conflict(message)
        } else {
            ApiError::Validation(message)
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Domain(e) => e.into(),
            StoreError::AlreadyExists(key) => ApiError::Conflict(format!("Already exists: {}", key)),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InsufficientPermissions => ApiError::Forbidden(err.to_string()),
            AuthError::WeakPassword(message) => ApiError::Validation(message),
            AuthError::Hash(_) | AuthError::Internal(_) => ApiError::Internal(err.to_string()),
            _ => ApiError::Unauthorized(err.to_string()),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        if err.is_client_error() {
            ApiError::Validation(err.to_string())
        } else {
            ApiError::Payment(err.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("Validation failed: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commerce_mapping() {
        let err: ApiError = CommerceError::ProductNotFound("P1".into()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = CommerceError::CannotCancel("shipped".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = CommerceError::InvalidQuantity(0).into();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_store_domain_error_unwraps() {
        let err: ApiError = StoreError::Domain(CommerceError::OrderNotFound("o".into())).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = StoreError::Backend("disk on fire".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Server error");
    }

    #[test]
    fn test_auth_mapping() {
        let err: ApiError = AuthError::MissingToken.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        let err: ApiError = AuthError::InsufficientPermissions.into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_payment_mapping() {
        let err: ApiError = PaymentError::InvalidSignature.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err: ApiError = PaymentError::Gateway {
            gateway: "stripe",
            message: "card declined".into(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.public_message().contains("card declined"));
    }
}
