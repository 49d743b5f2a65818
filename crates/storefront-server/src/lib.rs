//! HTTP server for the storefront.
//!
//! Wires the domain crates into an axum [`Router`](axum::Router):
//!
//! - **config**: TOML/JSON configuration with environment overrides
//! - **services**: accounts, catalog, cart, wishlist and the order workflow
//! - **http**: routes, the bearer-token extractor and the JSON envelope
//! - **logging**: tracing subscriber and request logging

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod services;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http::router;
pub use state::{AppState, ShopSettings};
