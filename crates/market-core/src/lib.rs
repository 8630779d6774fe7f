//! # market-core
//!
//! Core types and traits for the student-market transaction engine.
//!
//! This crate provides:
//! - `PaymentGateway` trait for payment processor adapters
//! - `CheckoutFlow` state machine for the redirect-based checkout round trip
//! - `Listing` and `ListingStore` for the marketplace listings
//! - `SessionStore` for the mock client-side authentication record
//! - `MarketError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use market_core::{CheckoutFlow, PaymentItem, Money, RedirectUrls};
//!
//! // Buyer clicks "Buy Now" on a single product
//! let item = PaymentItem::new("1", "Calculus Textbook", Money::from_dollars(85.0), 1);
//! let mut flow = CheckoutFlow::buy(item);
//!
//! // Create the payment and redirect the user to the approval URL
//! flow.begin(gateway.as_ref(), &urls).await;
//! let approval = flow.approval_url().unwrap();
//!
//! // ... user approves on the processor's page, redirect comes back ...
//! flow.resume(gateway.as_ref(), store.as_ref(), &payment_id, &payer_id).await;
//! ```

pub mod checkout;
pub mod error;
pub mod gateway;
pub mod listing;
pub mod payment;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use checkout::{CheckoutFlow, CheckoutKind, CheckoutState};
pub use error::{MarketError, MarketResult};
pub use gateway::{BoxedGateway, PaymentGateway, RedirectUrls};
pub use listing::{Condition, Listing, ListingDraft, ListingStatus, SellerProfile};
pub use payment::{order_total, validate_items, CapturedPayment, CreatedPayment, Money, PaymentItem};
pub use session::{SessionStore, UserProfile, Year};
pub use store::{BoxedListingStore, ListingStore};
