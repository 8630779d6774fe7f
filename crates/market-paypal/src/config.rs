//! # PayPal Configuration
//!
//! Configuration management for the PayPal integration.
//! All secrets are loaded from environment variables.

use market_core::MarketError;
use std::env;

/// Processor environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayPalMode {
    Sandbox,
    Live,
}

impl PayPalMode {
    fn api_base_url(&self) -> &'static str {
        match self {
            PayPalMode::Sandbox => "https://api.sandbox.paypal.com",
            PayPalMode::Live => "https://api.paypal.com",
        }
    }
}

/// PayPal API configuration
#[derive(Debug, Clone)]
pub struct PayPalConfig {
    /// REST app client id
    pub client_id: String,

    /// REST app client secret
    pub client_secret: String,

    /// Sandbox or live
    pub mode: PayPalMode,

    /// API base URL (overridable for testing/mocking)
    pub api_base_url: String,
}

impl PayPalConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PAYPAL_CLIENT_ID`
    /// - `PAYPAL_CLIENT_SECRET`
    ///
    /// Optional:
    /// - `PAYPAL_MODE` — `sandbox` (default) or `live`
    pub fn from_env() -> Result<Self, MarketError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let client_id = env::var("PAYPAL_CLIENT_ID")
            .map_err(|_| MarketError::Configuration("PAYPAL_CLIENT_ID not set".to_string()))?;

        let client_secret = env::var("PAYPAL_CLIENT_SECRET")
            .map_err(|_| MarketError::Configuration("PAYPAL_CLIENT_SECRET not set".to_string()))?;

        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return Err(MarketError::Configuration(
                "PayPal credentials missing".to_string(),
            ));
        }

        let mode = match env::var("PAYPAL_MODE").as_deref() {
            Ok("live") => PayPalMode::Live,
            Ok("sandbox") | Err(_) => PayPalMode::Sandbox,
            Ok(other) => {
                return Err(MarketError::Configuration(format!(
                    "PAYPAL_MODE must be 'sandbox' or 'live', got '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            client_id,
            client_secret,
            mode,
            api_base_url: mode.api_base_url().to_string(),
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            mode: PayPalMode::Sandbox,
            api_base_url: PayPalMode::Sandbox.api_base_url().to_string(),
        }
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn is_sandbox(&self) -> bool {
        self.mode == PayPalMode::Sandbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_base_urls() {
        assert_eq!(
            PayPalMode::Sandbox.api_base_url(),
            "https://api.sandbox.paypal.com"
        );
        assert_eq!(PayPalMode::Live.api_base_url(), "https://api.paypal.com");
    }

    #[test]
    fn test_explicit_config_defaults_to_sandbox() {
        let config = PayPalConfig::new("client-abc", "secret-xyz");
        assert!(config.is_sandbox());
        assert_eq!(config.api_base_url, "https://api.sandbox.paypal.com");
    }

    #[test]
    fn test_base_url_override() {
        let config =
            PayPalConfig::new("client-abc", "secret-xyz").with_api_base_url("http://127.0.0.1:9000");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000");
    }
}
