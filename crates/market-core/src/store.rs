//! # Listing Store Trait
//!
//! Storage seam for listings. Two backends implement this in
//! `market-store`: a MongoDB-backed store and an in-process map used when
//! no database is configured or reachable. Selection happens once at
//! startup; callers never see which backend they got.

use crate::error::MarketResult;
use crate::listing::{Listing, ListingDraft};
use async_trait::async_trait;
use std::sync::Arc;

/// Persistence surface for marketplace listings
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Persist a draft, assigning a generated id and timestamps.
    /// Returns the stored representation.
    async fn create_listing(&self, draft: ListingDraft) -> MarketResult<Listing>;

    /// All listings whose seller id matches. Insertion order in the
    /// in-memory backend, store-default order otherwise.
    async fn listings_by_seller(&self, seller_id: &str) -> MarketResult<Vec<Listing>>;

    /// Bulk-insert drafts and return the generated ids. Used by the
    /// demo seed endpoint, not production writes.
    async fn insert_many(&self, drafts: Vec<ListingDraft>) -> MarketResult<Vec<String>>;

    /// Backend name (for logging)
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared listing store (dynamic dispatch)
pub type BoxedListingStore = Arc<dyn ListingStore>;
