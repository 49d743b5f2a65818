//! Payment method and the payment details recorded on an order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery.
    Cod,
    /// Card payment.
    Stripe,
    /// UPI, net banking and wallets.
    Razorpay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "cod",
            PaymentMethod::Stripe => "stripe",
            PaymentMethod::Razorpay => "razorpay",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "Cash on Delivery",
            PaymentMethod::Stripe => "Credit/Debit Card",
            PaymentMethod::Razorpay => "UPI / Net Banking / Wallets",
        }
    }

    pub fn all() -> [PaymentMethod; 3] {
        [
            PaymentMethod::Stripe,
            PaymentMethod::Razorpay,
            PaymentMethod::Cod,
        ]
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = crate::error::CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cod" => Ok(PaymentMethod::Cod),
            "stripe" => Ok(PaymentMethod::Stripe),
            "razorpay" => Ok(PaymentMethod::Razorpay),
            other => Err(crate::error::CommerceError::Validation(format!(
                "Unsupported payment method: {}",
                other
            ))),
        }
    }
}

/// Gateway details copied onto the order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    /// Gateway payment identifier.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_serde() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Razorpay).unwrap(),
            "\"razorpay\""
        );
        let method: PaymentMethod = serde_json::from_str("\"cod\"").unwrap();
        assert_eq!(method, PaymentMethod::Cod);
    }

    #[test]
    fn test_payment_method_from_str() {
        assert_eq!("Stripe".parse::<PaymentMethod>().unwrap(), PaymentMethod::Stripe);
        assert!("paypal".parse::<PaymentMethod>().is_err());
    }
}
