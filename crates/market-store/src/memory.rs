//! # In-Memory Listing Store
//!
//! Process-local fallback backend, keyed by collection name like the
//! document store it stands in for. Scoped to the life of the process and
//! intended for single-instance demo use; concurrent writers from other
//! instances are not coordinated.

use async_trait::async_trait;
use market_core::{Listing, ListingDraft, ListingStore, MarketResult};
use std::collections::HashMap;
use std::sync::Mutex;

pub(crate) const LISTINGS_COLLECTION: &str = "listings";

/// Map-backed listing store
#[derive(Default)]
pub struct MemoryListingStore {
    collections: Mutex<HashMap<String, Vec<Listing>>>,
}

impl MemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn create_listing(&self, draft: ListingDraft) -> MarketResult<Listing> {
        let listing = Listing::from_draft(draft);
        let mut collections = self.collections.lock().expect("store lock poisoned");
        collections
            .entry(LISTINGS_COLLECTION.to_string())
            .or_default()
            .push(listing.clone());
        Ok(listing)
    }

    async fn listings_by_seller(&self, seller_id: &str) -> MarketResult<Vec<Listing>> {
        let collections = self.collections.lock().expect("store lock poisoned");
        Ok(collections
            .get(LISTINGS_COLLECTION)
            .map(|listings| {
                listings
                    .iter()
                    .filter(|l| l.seller_id == seller_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert_many(&self, drafts: Vec<ListingDraft>) -> MarketResult<Vec<String>> {
        let mut collections = self.collections.lock().expect("store lock poisoned");
        let bucket = collections
            .entry(LISTINGS_COLLECTION.to_string())
            .or_default();

        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let listing = Listing::from_draft(draft);
            ids.push(listing.id.clone());
            bucket.push(listing);
        }
        Ok(ids)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
