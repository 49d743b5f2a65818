//! Server configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_commerce::Currency;

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_PATH: &str = "storefront.toml";

/// Server configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: HttpConfig,
    pub auth: AuthConfig,
    pub pricing: PricingConfig,
    pub payment: PaymentConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Address to listen on.
    pub bind: String,
    pub log_format: LogFormat,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC key for bearer tokens. A random key is used when unset.
    pub token_secret: Option<String>,
    pub token_ttl_days: i64,
    /// Accounts signing up with these emails become admins.
    pub admin_emails: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            token_ttl_days: storefront_auth::DEFAULT_TOKEN_TTL_DAYS,
            admin_emails: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub currency: Currency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub stripe_secret_key: Option<String>,
    pub stripe_api_base: String,
    pub razorpay_key_id: Option<String>,
    pub razorpay_key_secret: Option<String>,
    pub razorpay_api_base: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_secret_key: None,
            stripe_api_base: storefront_payment::STRIPE_API_BASE.to_string(),
            razorpay_key_id: None,
            razorpay_key_secret: None,
            razorpay_api_base: storefront_payment::RAZORPAY_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// JSON file of products loaded at start-up.
    pub products: Option<PathBuf>,
}

impl ServerConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Load `path`, or the default file if present, or built-in defaults.
    pub fn resolve(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load(DEFAULT_CONFIG_PATH)
            }
            None => Ok(Self::default()),
        }
    }

    /// Override secrets from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(secret) = lookup("STOREFRONT_TOKEN_SECRET") {
            self.auth.token_secret = Some(secret);
        }
        if let Some(key) = lookup("STRIPE_SECRET_KEY") {
            self.payment.stripe_secret_key = Some(key);
        }
        if let Some(key) = lookup("RAZORPAY_KEY_ID") {
            self.payment.razorpay_key_id = Some(key);
        }
        if let Some(key) = lookup("RAZORPAY_KEY_SECRET") {
            self.payment.razorpay_key_secret = Some(key);
        }
    }

    /// Copy with secrets masked, for printing.
    pub fn redacted(&self) -> Self {
        let mask = |value: &Option<String>| value.as_ref().map(|_| "********".to_string());
        let mut config = self.clone();
        config.auth.token_secret = mask(&self.auth.token_secret);
        config.payment.stripe_secret_key = mask(&self.payment.stripe_secret_key);
        config.payment.razorpay_key_secret = mask(&self.payment.razorpay_key_secret);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert_eq!(config.auth.token_ttl_days, 30);
        assert_eq!(config.pricing.currency, Currency::INR);
        assert!(config.payment.stripe_secret_key.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config: ServerConfig = toml::from_str(
            r#"
            [server]
            log_format = "json"

            [auth]
            admin_emails = ["owner@shop.in"]
            "#,
        )
        .unwrap();
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert_eq!(config.auth.admin_emails, vec!["owner@shop.in"]);
        assert_eq!(config.auth.token_ttl_days, 30);
    }

    #[test]
    fn test_env_overrides_secrets() {
        let env: HashMap<&str, &str> = [
            ("STOREFRONT_TOKEN_SECRET", "tok"),
            ("RAZORPAY_KEY_ID", "rzp_key"),
            ("STRIPE_SECRET_KEY", ""),
        ]
        .into_iter()
        .collect();
        let mut config = ServerConfig::default();
        config.apply_env_from(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.auth.token_secret.as_deref(), Some("tok"));
        assert_eq!(config.payment.razorpay_key_id.as_deref(), Some("rzp_key"));
        assert!(config.payment.stripe_secret_key.is_none());
    }

    #[test]
    fn test_redacted() {
        let mut config = ServerConfig::default();
        config.payment.stripe_secret_key = Some("sk_live_x".to_string());
        let shown = toml::to_string(&config.redacted()).unwrap();
        assert!(!shown.contains("sk_live_x"));
    }
}
