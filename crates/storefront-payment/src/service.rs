//! Dispatch over the configured gateways.

use crate::gateway::{is_resource_id, PaymentGateway};
use crate::signature::verify_signature;
use crate::types::{Authorization, CodConfirmation, MethodAvailability, PaymentRecord, Refund};
use crate::PaymentError;
use std::sync::Arc;
use storefront_commerce::checkout::PaymentMethod;
use tracing::{info, warn};

/// Currencies the card gateway accepts.
pub const CARD_CURRENCIES: [&str; 2] = ["inr", "usd"];

/// Currencies the regional gateway accepts.
pub const REGIONAL_CURRENCIES: [&str; 1] = ["INR"];

/// Regional gateway plus the secret its checkout callbacks are signed with.
#[derive(Clone)]
struct RegionalGateway {
    gateway: Arc<dyn PaymentGateway>,
    key_id: String,
    key_secret: String,
}

/// Entry point for every payment operation.
///
/// Gateways without credentials are absent; calling them fails with
/// [`PaymentError::NotConfigured`].
#[derive(Clone, Default)]
pub struct PaymentService {
    card: Option<Arc<dyn PaymentGateway>>,
    regional: Option<RegionalGateway>,
}

impl PaymentService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_card(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.card = Some(gateway);
        self
    }

    pub fn with_regional(
        mut self,
        gateway: Arc<dyn PaymentGateway>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Self {
        self.regional = Some(RegionalGateway {
            gateway,
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        });
        self
    }

    fn card(&self) -> Result<&Arc<dyn PaymentGateway>, PaymentError> {
        self.card.as_ref().ok_or(PaymentError::NotConfigured("Card"))
    }

    fn regional(&self) -> Result<&RegionalGateway, PaymentError> {
        self.regional
            .as_ref()
            .ok_or(PaymentError::NotConfigured("Razorpay"))
    }

    fn gateway(&self, method: PaymentMethod) -> Result<&Arc<dyn PaymentGateway>, PaymentError> {
        match method {
            PaymentMethod::Stripe => self.card(),
            PaymentMethod::Razorpay => Ok(&self.regional()?.gateway),
            PaymentMethod::Cod => Err(PaymentError::Validation(
                "Invalid payment gateway".to_string(),
            )),
        }
    }

    /// The methods shown at checkout and whether each can be used.
    pub fn methods(&self) -> Vec<MethodAvailability> {
        vec![
            MethodAvailability {
                id: PaymentMethod::Cod,
                name: PaymentMethod::Cod.display_name().to_string(),
                description: "Pay when you receive the order".to_string(),
                available: true,
            },
            MethodAvailability {
                id: PaymentMethod::Stripe,
                name: PaymentMethod::Stripe.display_name().to_string(),
                description: "Pay securely with Stripe".to_string(),
                available: self.card.is_some(),
            },
            MethodAvailability {
                id: PaymentMethod::Razorpay,
                name: "Razorpay".to_string(),
                description: "Pay with UPI, Cards, Net Banking".to_string(),
                available: self.regional.is_some(),
            },
        ]
    }

    /// Open a card payment intent for `amount` whole currency units.
    pub async fn create_card_intent(
        &self,
        amount: f64,
        currency: Option<&str>,
    ) -> Result<Authorization, PaymentError> {
        let currency = currency.unwrap_or("inr").to_lowercase();
        if !CARD_CURRENCIES.contains(&currency.as_str()) {
            return Err(PaymentError::Validation("Invalid currency".to_string()));
        }
        let amount_minor = to_minor_units(amount)?;
        let authorization = self.card()?.authorize(amount_minor, &currency).await?;
        info!(intent = %authorization.id, amount_minor, "card payment intent created");
        Ok(authorization)
    }

    /// Succeeds only once the intent has succeeded.
    pub async fn confirm_card(&self, payment_intent_id: &str) -> Result<PaymentRecord, PaymentError> {
        require_gateway_id(payment_intent_id, "Payment intent ID")?;
        let record = self.card()?.confirm(payment_intent_id).await?;
        info!(intent = %record.id, "card payment confirmed");
        Ok(record)
    }

    /// Create a gateway order the checkout widget is opened against.
    pub async fn create_regional_order(
        &self,
        amount: f64,
        currency: Option<&str>,
    ) -> Result<Authorization, PaymentError> {
        let currency = currency.unwrap_or("INR");
        if !REGIONAL_CURRENCIES.contains(&currency) {
            return Err(PaymentError::Validation("Invalid currency".to_string()));
        }
        let amount_minor = to_minor_units(amount)?;
        let regional = self.regional()?;
        let mut authorization = regional.gateway.authorize(amount_minor, currency).await?;
        authorization.key_id = Some(regional.key_id.clone());
        info!(order = %authorization.id, amount_minor, "regional gateway order created");
        Ok(authorization)
    }

    /// Check the checkout callback signature, then confirm the payment was
    /// captured.
    pub async fn verify_regional(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<PaymentRecord, PaymentError> {
        require_gateway_id(order_id, "Order ID")?;
        require_gateway_id(payment_id, "Payment ID")?;
        require_id(signature, "Signature is required")?;

        let regional = self.regional()?;
        if let Err(e) = verify_signature(order_id, payment_id, signature, &regional.key_secret) {
            warn!(order = order_id, payment = payment_id, "payment signature mismatch");
            return Err(e);
        }
        let record = regional.gateway.confirm(payment_id).await?;
        info!(payment = %record.id, "regional payment verified");
        Ok(record)
    }

    /// Cash on delivery needs no gateway; the order is confirmed as pending.
    pub fn cash_on_delivery(
        &self,
        amount: f64,
        order_id: &str,
    ) -> Result<CodConfirmation, PaymentError> {
        if !amount.is_finite() {
            return Err(PaymentError::Validation(
                "Amount must be a number".to_string(),
            ));
        }
        require_id(order_id, "Order ID is required")?;
        Ok(CodConfirmation {
            method: PaymentMethod::Cod,
            amount,
            order_id: order_id.to_string(),
            status: "pending".to_string(),
        })
    }

    /// Refund a payment in full, or `amount` whole units of it.
    pub async fn refund(
        &self,
        method: PaymentMethod,
        payment_id: &str,
        amount: Option<f64>,
    ) -> Result<Refund, PaymentError> {
        require_gateway_id(payment_id, "Payment ID")?;
        let amount_minor = amount.map(to_minor_units).transpose()?;
        let gateway = self.gateway(method)?;
        let refund = gateway.refund(payment_id, amount_minor).await?;
        info!(gateway = %method, payment = payment_id, refund = %refund.id, "refund processed");
        Ok(refund)
    }

    /// Current state of a payment at its gateway.
    pub async fn status(
        &self,
        method: PaymentMethod,
        payment_id: &str,
    ) -> Result<PaymentRecord, PaymentError> {
        require_gateway_id(payment_id, "Payment ID")?;
        self.gateway(method)?.fetch(payment_id).await
    }
}

/// Convert whole currency units to minor units, rounding to the nearest.
pub fn to_minor_units(amount: f64) -> Result<i64, PaymentError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(PaymentError::Validation(
            "Amount must be a positive number".to_string(),
        ));
    }
    let minor = (amount * 100.0).round();
    if minor < 1.0 {
        return Err(PaymentError::Validation(
            "Amount must be at least one minor unit".to_string(),
        ));
    }
    if minor >= i64::MAX as f64 {
        return Err(PaymentError::Validation("Amount is too large".to_string()));
    }
    Ok(minor as i64)
}

fn require_id(value: &str, message: &str) -> Result<(), PaymentError> {
    if value.trim().is_empty() {
        return Err(PaymentError::Validation(message.to_string()));
    }
    Ok(())
}

/// A gateway id must be present and stay inside the gateway's id charset.
fn require_gateway_id(value: &str, field: &str) -> Result<(), PaymentError> {
    require_id(value, &format!("{} is required", field))?;
    if !is_resource_id(value) {
        return Err(PaymentError::Validation(format!("{} is invalid", field)));
    }
    Ok(())
}
