//! Card payments through Stripe payment intents.

use crate::gateway::{is_resource_id, missing_field, resource_url, send_json, PaymentGateway};
use crate::types::{i64_field, str_field, Authorization, PaymentRecord, Refund};
use crate::PaymentError;
use async_trait::async_trait;
use serde_json::Value;
use storefront_commerce::checkout::PaymentMethod;
use tracing::debug;

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

const NAME: &str = "stripe";

/// Stripe REST client. Requests are form-encoded with bearer auth.
#[derive(Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeGateway {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self::with_base(secret_key, STRIPE_API_BASE)
    }

    pub fn with_base(secret_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: secret_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

fn intent_form(amount_minor: i64, currency: &str) -> Vec<(&'static str, String)> {
    vec![
        ("amount", amount_minor.to_string()),
        ("currency", currency.to_lowercase()),
        ("payment_method_types[]", "card".to_string()),
        (
            "metadata[integration_check]",
            "accept_a_payment".to_string(),
        ),
    ]
}

fn refund_form(payment_id: &str, amount_minor: Option<i64>) -> Vec<(&'static str, String)> {
    let mut form = vec![("payment_intent", payment_id.to_string())];
    if let Some(amount) = amount_minor {
        form.push(("amount", amount.to_string()));
    }
    form
}

fn parse_intent(body: Value) -> Result<PaymentRecord, PaymentError> {
    Ok(PaymentRecord {
        gateway: PaymentMethod::Stripe,
        id: str_field(&body, "id").ok_or_else(|| missing_field(NAME, "id"))?,
        status: str_field(&body, "status").unwrap_or_default(),
        amount_minor: i64_field(&body, "amount"),
        currency: str_field(&body, "currency"),
        raw: body,
    })
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    fn success_status(&self) -> &'static str {
        "succeeded"
    }

    async fn authorize(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<Authorization, PaymentError> {
        debug!(amount_minor, currency, "creating payment intent");
        let request = self
            .client
            .post(self.url("/v1/payment_intents"))
            .bearer_auth(&self.secret_key)
            .form(&intent_form(amount_minor, currency));
        let body = send_json(NAME, request).await?;
        let client_secret = str_field(&body, "client_secret");
        let record = parse_intent(body)?;
        Ok(Authorization {
            gateway: PaymentMethod::Stripe,
            id: record.id,
            amount_minor: record.amount_minor.unwrap_or(amount_minor),
            currency: record.currency.unwrap_or_else(|| currency.to_lowercase()),
            status: record.status,
            client_secret,
            receipt: None,
            key_id: None,
            raw: record.raw,
        })
    }

    async fn fetch(&self, payment_id: &str) -> Result<PaymentRecord, PaymentError> {
        let request = self
            .client
            .get(resource_url(
                NAME,
                &self.api_base,
                &["v1", "payment_intents"],
                payment_id,
                None,
            )?)
            .bearer_auth(&self.secret_key);
        parse_intent(send_json(NAME, request).await?)
    }

    async fn refund(
        &self,
        payment_id: &str,
        amount_minor: Option<i64>,
    ) -> Result<Refund, PaymentError> {
        if !is_resource_id(payment_id) {
            return Err(PaymentError::Validation("Invalid payment ID".to_string()));
        }
        let request = self
            .client
            .post(self.url("/v1/refunds"))
            .bearer_auth(&self.secret_key)
            .form(&refund_form(payment_id, amount_minor));
        let body = send_json(NAME, request).await?;
        Ok(Refund {
            gateway: PaymentMethod::Stripe,
            id: str_field(&body, "id").ok_or_else(|| missing_field(NAME, "id"))?,
            payment_id: payment_id.to_string(),
            amount_minor: i64_field(&body, "amount"),
            status: str_field(&body, "status").unwrap_or_default(),
            raw: body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_intent_form() {
        let form = intent_form(118000, "INR");
        assert!(form.contains(&("amount", "118000".to_string())));
        assert!(form.contains(&("currency", "inr".to_string())));
        assert!(form.contains(&("payment_method_types[]", "card".to_string())));
    }

    #[test]
    fn test_full_refund_omits_amount() {
        assert_eq!(refund_form("pi_1", None).len(), 1);
        assert!(refund_form("pi_1", Some(500)).contains(&("amount", "500".to_string())));
    }

    #[test]
    fn test_parse_intent() {
        let record = parse_intent(json!({
            "id": "pi_123",
            "status": "succeeded",
            "amount": 118000,
            "currency": "inr"
        }))
        .unwrap();
        assert_eq!(record.id, "pi_123");
        assert_eq!(record.status, "succeeded");
        assert_eq!(record.amount_minor, Some(118000));
    }

    #[test]
    fn test_parse_intent_without_id() {
        assert!(matches!(
            parse_intent(json!({"status": "succeeded"})),
            Err(PaymentError::Transport { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_rejects_path_in_id() {
        // Nothing listens on port 9; a valid id would fail with Transport.
        let gateway = StripeGateway::with_base("sk_test", "http://127.0.0.1:9");
        assert!(matches!(
            gateway.fetch("../customers?limit=100").await,
            Err(PaymentError::Validation(_))
        ));
        assert!(matches!(
            gateway.refund("pi_1&amount=1", None).await,
            Err(PaymentError::Validation(_))
        ));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let gateway = StripeGateway::with_base("sk_test", "http://localhost:12111/");
        assert_eq!(
            gateway.url("/v1/refunds"),
            "http://localhost:12111/v1/refunds"
        );
    }
}
