//! Gateway-neutral payment records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_commerce::checkout::PaymentMethod;

/// A payment opened at a gateway, waiting for the customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub gateway: PaymentMethod,
    /// Payment intent or gateway order ID.
    pub id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    /// Secret the browser needs to complete a card payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    /// Public key the checkout widget is opened with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    /// The gateway's own response.
    #[serde(default)]
    pub raw: Value,
}

/// A payment as the gateway currently reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub gateway: PaymentMethod,
    pub id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_minor: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub raw: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    pub gateway: PaymentMethod,
    pub id: String,
    pub payment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_minor: Option<i64>,
    pub status: String,
    #[serde(default)]
    pub raw: Value,
}

/// Confirmation for a cash-on-delivery order. Nothing is collected up front.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodConfirmation {
    pub method: PaymentMethod,
    pub amount: f64,
    pub order_id: String,
    pub status: String,
}

/// One entry of the payment methods list shown at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MethodAvailability {
    pub id: PaymentMethod,
    pub name: String,
    pub description: String,
    pub available: bool,
}

pub(crate) fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn i64_field(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(Value::as_i64)
}

/// Pull a human-readable message out of a gateway error body.
///
/// Card gateway errors carry `error.message`, the regional gateway uses
/// `error.description`.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    str_field(error, "message").or_else(|| str_field(error, "description"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_shapes() {
        let card = json!({"error": {"message": "No such payment_intent"}});
        let regional = json!({"error": {"code": "BAD_REQUEST_ERROR", "description": "id is invalid"}});
        assert_eq!(error_message(&card).as_deref(), Some("No such payment_intent"));
        assert_eq!(error_message(&regional).as_deref(), Some("id is invalid"));
        assert_eq!(error_message(&json!({"ok": true})), None);
    }
}
