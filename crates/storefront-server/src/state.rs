//! Shared application state.

use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Duration;
use storefront_auth::{PasswordHasher, TokenSigner};
use storefront_commerce::Currency;
use storefront_payment::{PaymentService, RazorpayGateway, StripeGateway};
use storefront_store::repos::{CartRepo, OrderRepo, ProductRepo, UserRepo, WishlistRepo};
use storefront_store::Store;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::services::{AccountService, CartService, CatalogService, OrderService, WishlistService};

/// Shop-wide settings the services need.
#[derive(Debug, Clone, Default)]
pub struct ShopSettings {
    pub currency: Currency,
    pub admin_emails: Vec<String>,
}

/// Everything a handler can reach. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub catalog: CatalogService,
    pub carts: CartService,
    pub wishlists: WishlistService,
    pub orders: OrderService,
    pub payments: PaymentService,
    pub tokens: TokenSigner,
}

impl AppState {
    pub fn new(
        store: Store,
        tokens: TokenSigner,
        hasher: PasswordHasher,
        payments: PaymentService,
        settings: &ShopSettings,
    ) -> Self {
        let products = ProductRepo::new(store.clone());
        let carts = CartRepo::new(store.clone());
        let currency = settings.currency;

        Self {
            accounts: AccountService::new(
                UserRepo::new(store.clone()),
                hasher,
                tokens.clone(),
                &settings.admin_emails,
            ),
            catalog: CatalogService::new(products.clone(), currency),
            carts: CartService::new(carts.clone(), products.clone(), currency),
            wishlists: WishlistService::new(WishlistRepo::new(store.clone()), products.clone()),
            orders: OrderService::new(OrderRepo::new(store), products, carts, currency),
            payments,
            tokens,
        }
    }

    /// Build state over an in-memory store from configuration.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let ttl = Duration::days(config.auth.token_ttl_days);
        let tokens = match &config.auth.token_secret {
            Some(secret) => TokenSigner::new(secret, ttl),
            None => {
                warn!("no token secret configured, using a random one; tokens will not survive a restart");
                TokenSigner::random(ttl)
            }
        };

        let settings = ShopSettings {
            currency: config.pricing.currency,
            admin_emails: config.auth.admin_emails.clone(),
        };

        Ok(Self::new(
            Store::in_memory(),
            tokens,
            PasswordHasher::default(),
            payment_service(config)?,
            &settings,
        ))
    }
}

/// A half-configured razorpay key pair is rejected rather than silently
/// leaving regional payments off.
fn payment_service(config: &ServerConfig) -> Result<PaymentService> {
    let payment = &config.payment;
    let mut service = PaymentService::new();

    if let Some(key) = &payment.stripe_secret_key {
        service = service.with_card(Arc::new(StripeGateway::with_base(
            key.as_str(),
            payment.stripe_api_base.as_str(),
        )));
        info!("card payments enabled");
    }

    match (&payment.razorpay_key_id, &payment.razorpay_key_secret) {
        (Some(key_id), Some(key_secret)) => {
            let gateway = RazorpayGateway::with_base(
                key_id.as_str(),
                key_secret.as_str(),
                payment.razorpay_api_base.as_str(),
            );
            service = service.with_regional(Arc::new(gateway), key_id.as_str(), key_secret.as_str());
            info!("regional payments enabled");
        }
        (None, None) => {}
        _ => bail!("razorpay needs both key id and key secret"),
    }

    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_commerce::checkout::PaymentMethod;

    fn available(state: &AppState, method: PaymentMethod) -> bool {
        state
            .payments
            .methods()
            .into_iter()
            .any(|m| m.id == method && m.available)
    }

    #[test]
    fn test_from_config_without_gateways() {
        let state = AppState::from_config(&ServerConfig::default()).unwrap();
        assert!(available(&state, PaymentMethod::Cod));
        assert!(!available(&state, PaymentMethod::Stripe));
        assert!(!available(&state, PaymentMethod::Razorpay));
    }

    #[test]
    fn test_from_config_enables_configured_gateways() {
        let mut config = ServerConfig::default();
        config.payment.stripe_secret_key = Some("sk_test_1".to_string());
        config.payment.razorpay_key_id = Some("rzp_test_1".to_string());
        config.payment.razorpay_key_secret = Some("secret".to_string());

        let state = AppState::from_config(&config).unwrap();
        assert!(available(&state, PaymentMethod::Stripe));
        assert!(available(&state, PaymentMethod::Razorpay));
    }

    #[test]
    fn test_half_configured_razorpay_is_rejected() {
        let mut config = ServerConfig::default();
        config.payment.razorpay_key_id = Some("rzp_test_1".to_string());
        let err = AppState::from_config(&config).err().unwrap();
        assert!(err.to_string().contains("key secret"));

        let mut config = ServerConfig::default();
        config.payment.razorpay_key_secret = Some("secret".to_string());
        assert!(AppState::from_config(&config).is_err());
    }
}
