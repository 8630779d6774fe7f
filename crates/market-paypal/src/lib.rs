//! # market-paypal
//!
//! PayPal gateway adapter for student-market.
//!
//! Implements `market_core::PaymentGateway` over PayPal's classic REST
//! payments API:
//!
//! 1. `POST /v1/oauth2/token` — client-credentials token
//! 2. `POST /v1/payments/payment` — create a sale-intent payment, returns
//!    the hosted approval URL
//! 3. `POST /v1/payments/payment/{id}/execute` — capture after the buyer
//!    approves and the redirect comes back with `paymentId`/`PayerID`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use market_paypal::PayPalGateway;
//! use market_core::{PaymentGateway, PaymentItem, Money, RedirectUrls};
//!
//! let gateway = PayPalGateway::from_env()?;
//! let items = [PaymentItem::new("1", "Book", Money::from_dollars(85.0), 1)];
//! let created = gateway.create_payment(&items, &RedirectUrls::new(base_url)).await?;
//! // Redirect the buyer to created.approval_url
//! ```

pub mod config;
pub mod gateway;

// Re-exports
pub use config::{PayPalConfig, PayPalMode};
pub use gateway::PayPalGateway;
