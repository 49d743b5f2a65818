//! Payment gateway integration for the storefront.
//!
//! - **Card**: Stripe payment intents
//! - **Regional**: Razorpay orders (UPI, net banking, wallets) with signed
//!   checkout callbacks
//! - **Cash on delivery**: confirmed immediately as pending
//!
//! Gateways sit behind the [`PaymentGateway`] trait and are reached through
//! [`PaymentService`]. Failed gateway calls are reported once with the
//! gateway's own message; nothing is retried.

mod error;
mod gateway;
mod razorpay;
mod service;
mod signature;
mod stripe;
mod types;

pub use error::PaymentError;
pub use gateway::PaymentGateway;
pub use razorpay::{RazorpayGateway, RAZORPAY_API_BASE};
pub use service::{to_minor_units, PaymentService, CARD_CURRENCIES, REGIONAL_CURRENCIES};
pub use signature::{sign, verify_signature};
pub use stripe::{StripeGateway, STRIPE_API_BASE};
pub use types::{Authorization, CodConfirmation, MethodAvailability, PaymentRecord, Refund};
