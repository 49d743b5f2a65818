//! Payment errors.

use thiserror::Error;

/// Errors that can occur while taking or inspecting a payment.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Bad input (amount, currency, gateway name).
    #[error("{0}")]
    Validation(String),

    /// The gateway callback signature does not match.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The payment exists but is not in its successful terminal state.
    #[error("Payment not successful")]
    NotSuccessful { status: String },

    /// No credentials were configured for this gateway.
    #[error("{0} payments are not configured")]
    NotConfigured(&'static str),

    /// The gateway rejected the request.
    #[error("{gateway} error: {message}")]
    Gateway {
        gateway: &'static str,
        message: String,
    },

    /// The gateway could not be reached or answered garbage.
    #[error("{gateway} request failed: {message}")]
    Transport {
        gateway: &'static str,
        message: String,
    },
}

impl PaymentError {
    /// Check if the caller sent something the gateway will never accept.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PaymentError::Validation(_)
                | PaymentError::InvalidSignature
                | PaymentError::NotSuccessful { .. }
        )
    }
}
