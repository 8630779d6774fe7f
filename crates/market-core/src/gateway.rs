//! # Payment Gateway Trait
//!
//! Strategy trait for payment processor adapters. The marketplace talks to
//! the processor through this seam only, so the PayPal implementation can
//! be swapped for another hosted-checkout processor (or a scripted test
//! double) without touching the flow or the HTTP layer.

use crate::error::MarketResult;
use crate::payment::{CapturedPayment, CreatedPayment, PaymentItem};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment processor adapters.
///
/// Both operations are thin proxies around the processor's API: no local
/// persistence, no retries, no deduplication. Re-execution of an
/// already-captured payment is the processor's problem to reject.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment at the processor and return its id plus the
    /// hosted approval URL the buyer must be redirected to.
    ///
    /// Implementations must validate `items` (non-empty, positive prices)
    /// before any outbound call.
    async fn create_payment(
        &self,
        items: &[PaymentItem],
        urls: &RedirectUrls,
    ) -> MarketResult<CreatedPayment>;

    /// Finalize a previously approved payment.
    ///
    /// `payment_id` and `payer_id` are the two opaque identifiers the
    /// processor hands back on the redirect.
    async fn execute_payment(
        &self,
        payment_id: &str,
        payer_id: &str,
    ) -> MarketResult<CapturedPayment>;

    /// Processor name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedGateway = Arc<dyn PaymentGateway>;

/// Redirect targets handed to the processor at payment creation
#[derive(Debug, Clone)]
pub struct RedirectUrls {
    /// Base URL of the host application (e.g. "http://localhost:8080")
    pub base_url: String,
}

impl RedirectUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Success page; the processor appends `paymentId` and `PayerID`
    pub fn success_url(&self) -> String {
        format!("{}/success", self.base_url)
    }

    /// Cancel page; reached with no parameters
    pub fn cancel_url(&self) -> String {
        format!("{}/cancel", self.base_url)
    }
}

impl Default for RedirectUrls {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_urls() {
        let urls = RedirectUrls::new("https://studentmarket.example");

        assert_eq!(urls.success_url(), "https://studentmarket.example/success");
        assert_eq!(urls.cancel_url(), "https://studentmarket.example/cancel");
    }
}
