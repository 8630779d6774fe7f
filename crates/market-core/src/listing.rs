//! # Listing Types
//!
//! Marketplace listing records: the client-submitted draft and the stored
//! representation with generated id and timestamps. Wire field names are
//! camelCase to match the original JSON API.

use crate::error::{MarketError, MarketResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Physical condition of the item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

/// Lifecycle status of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Sold,
    Reserved,
}

impl Default for ListingStatus {
    fn default() -> Self {
        ListingStatus::Available
    }
}

/// Denormalized seller snapshot carried on each listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerProfile {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub university: String,
    pub rating: f64,
}

/// A listing payload as submitted by the sell flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    /// Price in USD; must be non-negative
    pub price: f64,
    pub category: String,
    pub condition: Condition,
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub seller_id: String,
    pub seller: SellerProfile,
}

impl ListingDraft {
    /// Validate required fields before the draft reaches storage
    pub fn validate(&self) -> MarketResult<()> {
        if self.title.trim().is_empty() {
            return Err(MarketError::InvalidListing(
                "title is required".to_string(),
            ));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(MarketError::InvalidListing(
                "price must be a non-negative number".to_string(),
            ));
        }
        if self.seller_id.trim().is_empty() {
            return Err(MarketError::InvalidListing(
                "sellerId is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// A stored listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Generated id
    pub id: String,

    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub condition: Condition,
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,

    pub seller_id: String,
    pub seller: SellerProfile,

    #[serde(default)]
    pub status: ListingStatus,

    /// View counter (placeholder, mutated by the product page)
    #[serde(default)]
    pub views: u64,

    /// Like counter (placeholder)
    #[serde(default)]
    pub likes: u64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Build a stored listing from a validated draft, assigning a
    /// generated id and fresh timestamps.
    pub fn from_draft(draft: ListingDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            price: draft.price,
            category: draft.category,
            condition: draft.condition,
            location: draft.location,
            images: draft.images,
            tags: draft.tags,
            seller_id: draft.seller_id,
            seller: draft.seller,
            status: ListingStatus::Available,
            views: 0,
            likes: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draft(seller_id: &str) -> ListingDraft {
        ListingDraft {
            title: "Calculus Textbook - 8th Edition".to_string(),
            description: "Excellent condition calculus textbook.".to_string(),
            price: 85.0,
            category: "textbooks".to_string(),
            condition: Condition::LikeNew,
            location: "Library Pickup".to_string(),
            images: vec![],
            tags: vec!["math".to_string(), "textbook".to_string()],
            seller_id: seller_id.to_string(),
            seller: SellerProfile {
                id: seller_id.to_string(),
                name: "John Smith".to_string(),
                avatar: None,
                university: "State University".to_string(),
                rating: 4.8,
            },
        }
    }

    #[test]
    fn test_from_draft_assigns_id_and_defaults() {
        let listing = Listing::from_draft(sample_draft("user1"));

        assert!(!listing.id.is_empty());
        assert_eq!(listing.status, ListingStatus::Available);
        assert_eq!(listing.views, 0);
        assert_eq!(listing.likes, 0);
        assert_eq!(listing.created_at, listing.updated_at);
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let mut draft = sample_draft("user1");
        draft.title = "  ".to_string();
        assert!(matches!(
            draft.validate(),
            Err(MarketError::InvalidListing(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut draft = sample_draft("user1");
        draft.price = -1.0;
        assert!(draft.validate().is_err());

        // Zero is allowed: give-away listings are legal
        draft.price = 0.0;
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_condition_wire_format() {
        let json = serde_json::to_string(&Condition::LikeNew).unwrap();
        assert_eq!(json, "\"like-new\"");
    }
}
