//! # PayPal Payments
//!
//! Implementation of the create/execute payment round trip against
//! PayPal's classic REST payments API. This is the only place the
//! marketplace talks to the processor; nothing is persisted locally and
//! the payment is referenced by id across the approval redirect.

use crate::config::PayPalConfig;
use async_trait::async_trait;
use market_core::{
    order_total, validate_items, CapturedPayment, CreatedPayment, MarketError, MarketResult,
    PaymentGateway, PaymentItem, RedirectUrls,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

const PAYMENT_DESCRIPTION: &str = "Student Marketplace Payment";
const CURRENCY: &str = "USD";

/// PayPal gateway
///
/// Uses PayPal's hosted approval page; the buyer never enters payment
/// details on our pages.
pub struct PayPalGateway {
    config: PayPalConfig,
    client: Client,
}

impl PayPalGateway {
    /// Create a new PayPal gateway
    pub fn new(config: PayPalConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> MarketResult<Self> {
        let config = PayPalConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Fetch a client-credentials access token.
    ///
    /// Tokens are fetched per call rather than cached; the request volume
    /// of this system does not justify a token cache.
    async fn access_token(&self) -> MarketResult<String> {
        let url = format!("{}/v1/oauth2/token", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| MarketError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MarketError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("PayPal token error: status={}, body={}", status, body);
            return Err(provider_error(&body, status.as_u16()));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            MarketError::Serialization(format!("Failed to parse token response: {}", e))
        })?;

        Ok(token.access_token)
    }

    fn build_payment_request(
        items: &[PaymentItem],
        urls: &RedirectUrls,
    ) -> CreatePaymentRequest {
        let wire_items = items
            .iter()
            .map(|item| WireItem {
                name: item.name.clone(),
                sku: item.id.clone(),
                price: item.price.to_string(),
                currency: CURRENCY.to_string(),
                quantity: item.quantity,
            })
            .collect();

        CreatePaymentRequest {
            intent: "sale".to_string(),
            payer: Payer {
                payment_method: "paypal".to_string(),
            },
            redirect_urls: WireRedirectUrls {
                return_url: urls.success_url(),
                cancel_url: urls.cancel_url(),
            },
            transactions: vec![Transaction {
                item_list: ItemList { items: wire_items },
                amount: Amount {
                    currency: CURRENCY.to_string(),
                    total: order_total(items).to_string(),
                },
                description: PAYMENT_DESCRIPTION.to_string(),
            }],
        }
    }
}

#[async_trait]
impl PaymentGateway for PayPalGateway {
    #[instrument(skip(self, items, urls), fields(items = items.len()))]
    async fn create_payment(
        &self,
        items: &[PaymentItem],
        urls: &RedirectUrls,
    ) -> MarketResult<CreatedPayment> {
        validate_items(items)?;

        let request = Self::build_payment_request(items, urls);

        debug!(
            "Creating PayPal payment: {} items, total={}",
            items.len(),
            request.transactions[0].amount.total
        );

        let token = self.access_token().await?;
        let url = format!("{}/v1/payments/payment", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await
            .map_err(|e| MarketError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MarketError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("PayPal create error: status={}, body={}", status, body);
            return Err(provider_error(&body, status.as_u16()));
        }

        let payment: PaymentResponse = serde_json::from_str(&body).map_err(|e| {
            MarketError::Serialization(format!("Failed to parse PayPal response: {}", e))
        })?;

        // The approval URL is what the buyer is navigated to; a 2xx
        // response without one is unusable.
        let approval_url = payment
            .links
            .iter()
            .find(|l| l.rel == "approval_url")
            .map(|l| l.href.clone())
            .ok_or_else(|| {
                MarketError::MalformedResponse(
                    "no approval_url link in payment response".to_string(),
                )
            })?;

        info!(
            "Created PayPal payment: id={}, approval_url={}",
            payment.id, approval_url
        );

        Ok(CreatedPayment {
            id: payment.id,
            approval_url,
        })
    }

    #[instrument(skip(self, payer_id))]
    async fn execute_payment(
        &self,
        payment_id: &str,
        payer_id: &str,
    ) -> MarketResult<CapturedPayment> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/v1/payments/payment/{}/execute",
            self.config.api_base_url, payment_id
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&ExecutePaymentRequest {
                payer_id: payer_id.to_string(),
            })
            .send()
            .await
            .map_err(|e| MarketError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MarketError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("PayPal execute error: status={}, body={}", status, body);
            return Err(provider_error(&body, status.as_u16()));
        }

        let raw: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            MarketError::Serialization(format!("Failed to parse PayPal response: {}", e))
        })?;

        let id = raw
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or(payment_id)
            .to_string();
        let state = raw
            .get("state")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();

        info!("Executed PayPal payment: id={}, state={}", id, state);

        Ok(CapturedPayment { id, state, raw })
    }

    fn provider_name(&self) -> &'static str {
        "paypal"
    }
}

/// Surface the processor's own message where one exists, the raw body
/// otherwise.
fn provider_error(body: &str, status: u16) -> MarketError {
    if let Ok(err) = serde_json::from_str::<PayPalErrorResponse>(body) {
        let message = match err.message {
            Some(message) => format!("{}: {}", err.name, message),
            None => err.name,
        };
        return MarketError::ProviderError {
            provider: "paypal".to_string(),
            message,
        };
    }

    MarketError::ProviderError {
        provider: "paypal".to_string(),
        message: format!("HTTP {}: {}", status, body),
    }
}

// =============================================================================
// PayPal API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreatePaymentRequest {
    intent: String,
    payer: Payer,
    redirect_urls: WireRedirectUrls,
    transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize)]
struct Payer {
    payment_method: String,
}

#[derive(Debug, Serialize)]
struct WireRedirectUrls {
    return_url: String,
    cancel_url: String,
}

#[derive(Debug, Serialize)]
struct Transaction {
    item_list: ItemList,
    amount: Amount,
    description: String,
}

#[derive(Debug, Serialize)]
struct ItemList {
    items: Vec<WireItem>,
}

#[derive(Debug, Serialize)]
struct WireItem {
    name: String,
    sku: String,
    /// Two-decimal string, e.g. "85.00"
    price: String,
    currency: String,
    quantity: u32,
}

#[derive(Debug, Serialize)]
struct Amount {
    currency: String,
    total: String,
}

#[derive(Debug, Serialize)]
struct ExecutePaymentRequest {
    payer_id: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    id: String,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
    rel: String,
}

#[derive(Debug, Deserialize)]
struct PayPalErrorResponse {
    name: String,
    #[serde(default)]
    message: Option<String>,
}
