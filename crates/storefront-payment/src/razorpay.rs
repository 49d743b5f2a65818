//! UPI, net banking and wallet payments through Razorpay.

use crate::gateway::{missing_field, resource_url, send_json, PaymentGateway};
use crate::types::{i64_field, str_field, Authorization, PaymentRecord, Refund};
use crate::PaymentError;
use async_trait::async_trait;
use serde_json::{json, Value};
use storefront_commerce::checkout::PaymentMethod;
use tracing::debug;

pub const RAZORPAY_API_BASE: &str = "https://api.razorpay.com";

const NAME: &str = "razorpay";

/// Razorpay REST client. Requests are JSON with basic auth.
#[derive(Clone)]
pub struct RazorpayGateway {
    client: reqwest::Client,
    key_id: String,
    key_secret: String,
    api_base: String,
}

impl RazorpayGateway {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self::with_base(key_id, key_secret, RAZORPAY_API_BASE)
    }

    pub fn with_base(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

fn order_body(amount_minor: i64, currency: &str, receipt: &str) -> Value {
    json!({
        "amount": amount_minor,
        "currency": currency.to_uppercase(),
        "receipt": receipt,
        "payment_capture": 1,
    })
}

fn refund_body(amount_minor: Option<i64>) -> Value {
    match amount_minor {
        Some(amount) => json!({ "amount": amount }),
        None => json!({}),
    }
}

fn parse_payment(body: Value) -> Result<PaymentRecord, PaymentError> {
    Ok(PaymentRecord {
        gateway: PaymentMethod::Razorpay,
        id: str_field(&body, "id").ok_or_else(|| missing_field(NAME, "id"))?,
        status: str_field(&body, "status").unwrap_or_default(),
        amount_minor: i64_field(&body, "amount"),
        currency: str_field(&body, "currency"),
        raw: body,
    })
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn success_status(&self) -> &'static str {
        "captured"
    }

    async fn authorize(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<Authorization, PaymentError> {
        let receipt = format!("receipt_{}", chrono::Utc::now().timestamp_millis());
        debug!(amount_minor, currency, %receipt, "creating gateway order");
        let request = self
            .client
            .post(self.url("/v1/orders"))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&order_body(amount_minor, currency, &receipt));
        let body = send_json(NAME, request).await?;
        Ok(Authorization {
            gateway: PaymentMethod::Razorpay,
            id: str_field(&body, "id").ok_or_else(|| missing_field(NAME, "id"))?,
            amount_minor: i64_field(&body, "amount").unwrap_or(amount_minor),
            currency: str_field(&body, "currency").unwrap_or_else(|| currency.to_uppercase()),
            status: str_field(&body, "status").unwrap_or_default(),
            client_secret: None,
            receipt: Some(receipt),
            key_id: Some(self.key_id.clone()),
            raw: body,
        })
    }

    async fn fetch(&self, payment_id: &str) -> Result<PaymentRecord, PaymentError> {
        let request = self
            .client
            .get(resource_url(
                NAME,
                &self.api_base,
                &["v1", "payments"],
                payment_id,
                None,
            )?)
            .basic_auth(&self.key_id, Some(&self.key_secret));
        parse_payment(send_json(NAME, request).await?)
    }

    async fn refund(
        &self,
        payment_id: &str,
        amount_minor: Option<i64>,
    ) -> Result<Refund, PaymentError> {
        let request = self
            .client
            .post(resource_url(
                NAME,
                &self.api_base,
                &["v1", "payments"],
                payment_id,
                Some("refund"),
            )?)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&refund_body(amount_minor));
        let body = send_json(NAME, request).await?;
        Ok(Refund {
            gateway: PaymentMethod::Razorpay,
            id: str_field(&body, "id").ok_or_else(|| missing_field(NAME, "id"))?,
            payment_id: payment_id.to_string(),
            amount_minor: i64_field(&body, "amount"),
            status: str_field(&body, "status").unwrap_or_default(),
            raw: body,
        })
    }
}
