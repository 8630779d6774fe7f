//! # Payment Types
//!
//! Items, totals, and processor-side payment records.
//!
//! Amounts are carried in cents to keep totals exact; the processor wire
//! format wants two-decimal strings ("85.00"), which `Money`'s `Display`
//! produces.

use crate::error::{MarketError, MarketResult};
use serde::{Deserialize, Serialize};

/// A USD amount in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents
    pub cents: i64,
}

impl Money {
    /// Create from a decimal dollar amount, rounding to the nearest cent
    pub fn from_dollars(amount: f64) -> Self {
        Self {
            cents: (amount * 100.0).round() as i64,
        }
    }

    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub fn as_dollars(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }
}

impl std::fmt::Display for Money {
    /// Two-decimal string as the processor expects ("85.00", "25.50")
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// A line item in a payment request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentItem {
    /// Product ID (becomes the processor SKU)
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Money,

    /// Quantity
    pub quantity: u32,
}

impl PaymentItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Total for this line (unit price x quantity)
    pub fn total(&self) -> Money {
        Money::from_cents(self.price.cents * self.quantity as i64)
    }
}

/// Compute the payment total as the sum of line totals
pub fn order_total(items: &[PaymentItem]) -> Money {
    Money::from_cents(items.iter().map(|i| i.total().cents).sum())
}

/// Validate a payment item list before any processor contact.
///
/// Rejects an empty list, blank ids/names, non-positive prices, and
/// zero quantities.
pub fn validate_items(items: &[PaymentItem]) -> MarketResult<()> {
    if items.is_empty() {
        return Err(MarketError::InvalidRequest(
            "Invalid items data: at least one item is required".to_string(),
        ));
    }

    for item in items {
        if item.id.trim().is_empty() || item.name.trim().is_empty() {
            return Err(MarketError::InvalidRequest(
                "Invalid items data: item id and name are required".to_string(),
            ));
        }
        if !item.price.is_positive() {
            return Err(MarketError::InvalidRequest(format!(
                "Invalid items data: price must be positive for item '{}'",
                item.id
            )));
        }
        if item.quantity == 0 {
            return Err(MarketError::InvalidRequest(format!(
                "Invalid items data: quantity must be at least 1 for item '{}'",
                item.id
            )));
        }
    }

    Ok(())
}

/// A payment created at the processor, awaiting buyer approval.
///
/// Lives only at the processor; we hold its id across the redirect
/// round trip and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPayment {
    /// Processor-assigned payment id
    pub id: String,

    /// Hosted approval page the buyer must be navigated to
    pub approval_url: String,
}

/// A payment captured after buyer approval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedPayment {
    /// Processor-assigned payment id
    pub id: String,

    /// Processor state string ("approved", ...)
    pub state: String,

    /// Full payment record as returned by the processor
    pub raw: serde_json::Value,
}
