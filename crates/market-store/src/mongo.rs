//! # MongoDB Listing Store
//!
//! Document-store backend over the `studentmarket` database. Direct
//! passthrough CRUD; no sessions, no transactions.

use async_trait::async_trait;
use futures::StreamExt;
use market_core::{Listing, ListingDraft, ListingStore, MarketError, MarketResult};
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use std::time::Duration;
use tracing::info;

use crate::memory::LISTINGS_COLLECTION;

const DB_NAME: &str = "studentmarket";

/// MongoDB-backed listing store
pub struct MongoListingStore {
    listings: Collection<Listing>,
}

impl MongoListingStore {
    /// Connect and verify reachability with a ping.
    ///
    /// Server selection is capped at a few seconds so an unreachable
    /// database degrades to the in-memory fallback quickly instead of
    /// hanging startup.
    pub async fn connect(uri: &str) -> MarketResult<Self> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| MarketError::Storage(format!("invalid MongoDB URI: {}", e)))?;
        options.server_selection_timeout = Some(Duration::from_secs(3));

        let client = Client::with_options(options)
            .map_err(|e| MarketError::Storage(format!("MongoDB client error: {}", e)))?;

        let db = client.database(DB_NAME);
        db.run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| MarketError::Storage(format!("MongoDB unreachable: {}", e)))?;

        info!("Connected to MongoDB database '{}'", DB_NAME);

        Ok(Self {
            listings: db.collection::<Listing>(LISTINGS_COLLECTION),
        })
    }
}

#[async_trait]
impl ListingStore for MongoListingStore {
    async fn create_listing(&self, draft: ListingDraft) -> MarketResult<Listing> {
        let listing = Listing::from_draft(draft);
        self.listings
            .insert_one(&listing, None)
            .await
            .map_err(|e| MarketError::Storage(format!("insert failed: {}", e)))?;
        Ok(listing)
    }

    async fn listings_by_seller(&self, seller_id: &str) -> MarketResult<Vec<Listing>> {
        let mut cursor = self
            .listings
            .find(doc! { "sellerId": seller_id }, None)
            .await
            .map_err(|e| MarketError::Storage(format!("query failed: {}", e)))?;

        let mut results = Vec::new();
        while let Some(listing) = cursor.next().await {
            let listing =
                listing.map_err(|e| MarketError::Storage(format!("cursor error: {}", e)))?;
            results.push(listing);
        }
        Ok(results)
    }

    async fn insert_many(&self, drafts: Vec<ListingDraft>) -> MarketResult<Vec<String>> {
        let listings: Vec<Listing> = drafts.into_iter().map(Listing::from_draft).collect();
        let ids = listings.iter().map(|l| l.id.clone()).collect();

        self.listings
            .insert_many(&listings, None)
            .await
            .map_err(|e| MarketError::Storage(format!("bulk insert failed: {}", e)))?;

        Ok(ids)
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}
