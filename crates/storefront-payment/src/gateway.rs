//! The gateway seam and shared HTTP plumbing.

use crate::types::{error_message, Authorization, PaymentRecord, Refund};
use crate::PaymentError;
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

/// A remote payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Status the gateway reports for a completed payment.
    fn success_status(&self) -> &'static str;

    /// Open a payment for `amount_minor` in `currency`.
    async fn authorize(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<Authorization, PaymentError>;

    async fn fetch(&self, payment_id: &str) -> Result<PaymentRecord, PaymentError>;

    /// Refund `amount_minor`, or everything when `None`.
    async fn refund(
        &self,
        payment_id: &str,
        amount_minor: Option<i64>,
    ) -> Result<Refund, PaymentError>;

    /// Fetch a payment and fail unless it completed.
    async fn confirm(&self, payment_id: &str) -> Result<PaymentRecord, PaymentError> {
        let record = self.fetch(payment_id).await?;
        if record.status != self.success_status() {
            return Err(PaymentError::NotSuccessful {
                status: record.status,
            });
        }
        Ok(record)
    }
}

/// Whether `id` looks like a gateway resource id: ASCII letters, digits
/// and underscores only.
pub(crate) fn is_resource_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Build `{api_base}/{segments...}` with every segment percent-encoded.
///
/// Ids are checked with [`is_resource_id`] first, so a caller-supplied id
/// can never climb out of its collection or smuggle in a query.
pub(crate) fn resource_url(
    gateway: &'static str,
    api_base: &str,
    collection: &[&str],
    id: &str,
    action: Option<&str>,
) -> Result<Url, PaymentError> {
    if !is_resource_id(id) {
        return Err(PaymentError::Validation("Invalid payment ID".to_string()));
    }
    let mut url = Url::parse(api_base).map_err(|e| PaymentError::Transport {
        gateway,
        message: format!("invalid API base: {}", e),
    })?;
    url.path_segments_mut()
        .map_err(|_| PaymentError::Transport {
            gateway,
            message: "API base cannot take a path".to_string(),
        })?
        .pop_if_empty()
        .extend(collection)
        .push(id)
        .extend(action);
    Ok(url)
}

/// Send a request and decode the JSON body, turning non-2xx answers into
/// [`PaymentError::Gateway`] with the gateway's own message.
pub(crate) async fn send_json(
    gateway: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<Value, PaymentError> {
    let response = request.send().await.map_err(|e| PaymentError::Transport {
        gateway,
        message: e.to_string(),
    })?;
    let status = response.status();
    let body: Value = response.json().await.map_err(|e| PaymentError::Transport {
        gateway,
        message: e.to_string(),
    })?;

    if !status.is_success() {
        return Err(PaymentError::Gateway {
            gateway,
            message: error_message(&body).unwrap_or_else(|| status.to_string()),
        });
    }
    Ok(body)
}

pub(crate) fn missing_field(gateway: &'static str, field: &str) -> PaymentError {
    PaymentError::Transport {
        gateway,
        message: format!("response is missing `{}`", field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_charset() {
        assert!(is_resource_id("pi_3NkX9a2eZvKYlo2C"));
        assert!(is_resource_id("pay_29QQoUBi66xm2f"));
        assert!(!is_resource_id(""));
        assert!(!is_resource_id(".."));
        assert!(!is_resource_id("../customers"));
        assert!(!is_resource_id("pay_1?expand=card"));
        assert!(!is_resource_id("pay_1%2F"));
    }

    #[test]
    fn test_resource_url() {
        let url = resource_url(
            "razorpay",
            "http://localhost:12111",
            &["v1", "payments"],
            "pay_1",
            Some("refund"),
        )
        .unwrap();
        assert_eq!(url.as_str(), "http://localhost:12111/v1/payments/pay_1/refund");
    }

    #[test]
    fn test_resource_url_rejects_traversal() {
        for id in ["../customers?limit=100", "..", "a/b", "pi_1#x"] {
            let result = resource_url(
                "stripe",
                "http://localhost:12111",
                &["v1", "payment_intents"],
                id,
                None,
            );
            assert!(
                matches!(result, Err(PaymentError::Validation(_))),
                "{} was accepted",
                id
            );
        }
    }
}
