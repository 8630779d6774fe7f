//! # Request Handlers
//!
//! Axum request handlers for the marketplace API: the payment round trip,
//! listings CRUD, the demo seed, and the redirect return pages.

use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use market_core::{
    CheckoutFlow, CheckoutState, Listing, ListingDraft, MarketError, Money, PaymentItem,
};
use market_store::seed_sample_listings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create payment request
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Items to purchase
    #[serde(default)]
    pub items: Vec<PaymentItemRequest>,
}

/// Item in a payment request; prices arrive as JSON numbers in dollars
#[derive(Debug, Deserialize)]
pub struct PaymentItemRequest {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl PaymentItemRequest {
    fn into_item(self) -> PaymentItem {
        PaymentItem::new(self.id, self.name, Money::from_dollars(self.price), self.quantity)
    }
}

/// Create payment response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePaymentResponse {
    /// Processor-assigned payment id
    pub id: String,
    /// Hosted approval URL (navigate the buyer here)
    pub url: String,
}

/// Execute payment request. `paymentId` and `PayerID` are the two
/// identifiers the processor's redirect carries back; `listing` is the
/// sell flow's draft to publish once the payment is captured.
#[derive(Debug, Deserialize)]
pub struct ExecutePaymentRequest {
    #[serde(rename = "paymentId")]
    pub payment_id: String,
    #[serde(rename = "PayerID", alias = "payerId")]
    pub payer_id: String,
    #[serde(default)]
    pub listing: Option<ListingDraft>,
}

/// Execute payment response
#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutePaymentResponse {
    pub success: bool,
    /// Captured payment record as the processor returned it
    pub payment: serde_json::Value,
    /// Listing published by the sell flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing: Option<Listing>,
    /// Set on partial failure: payment captured, listing not created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Query parameters for listings lookup
#[derive(Debug, Deserialize)]
pub struct ListingsQuery {
    #[serde(rename = "sellerId")]
    pub seller_id: String,
}

/// Seed response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub message: String,
    pub inserted_ids: Vec<String>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

fn market_error_to_response(err: MarketError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let response = match &err {
        // Processor detail travels in `details`, the way the original
        // API shaped these bodies
        MarketError::ProviderError { message, .. } => {
            ErrorResponse::new("Payment processor error").with_details(message.clone())
        }
        _ => ErrorResponse::new(err.to_string()),
    };

    (status, Json(response))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "student-market",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a payment and return the hosted approval URL
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<Json<CreatePaymentResponse>, (StatusCode, Json<ErrorResponse>)> {
    let items: Vec<PaymentItem> = request
        .items
        .into_iter()
        .map(PaymentItemRequest::into_item)
        .collect();

    let created = state
        .gateway
        .create_payment(&items, &state.urls)
        .await
        .map_err(|e| {
            error!("Failed to create payment: {}", e);
            market_error_to_response(e)
        })?;

    info!("Created payment: {}", created.id);

    Ok(Json(CreatePaymentResponse {
        id: created.id,
        url: created.approval_url,
    }))
}

/// Execute an approved payment.
///
/// With a `listing` draft attached this is the sell flow: a captured
/// payment publishes the listing, and a storage failure after capture is
/// reported as success-with-error rather than failure, because the buyer
/// has already paid.
#[instrument(skip(state, request), fields(payment_id = %request.payment_id))]
pub async fn execute_payment(
    State(state): State<AppState>,
    Json(request): Json<ExecutePaymentRequest>,
) -> Result<Json<ExecutePaymentResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut flow = match request.listing {
        Some(draft) => CheckoutFlow::returning_sell(draft),
        None => CheckoutFlow::returning_buy(),
    };

    flow.resume(
        state.gateway.as_ref(),
        state.store.as_ref(),
        &request.payment_id,
        &request.payer_id,
    )
    .await;

    match flow.state() {
        CheckoutState::Succeeded { payment, listing } => Ok(Json(ExecutePaymentResponse {
            success: true,
            payment: payment.raw.clone(),
            listing: listing.clone(),
            error: None,
            details: None,
        })),
        CheckoutState::PaidNotListed { payment, reason } => {
            error!("Payment {} captured but listing not created: {}", payment.id, reason);
            Ok(Json(ExecutePaymentResponse {
                success: true,
                payment: payment.raw.clone(),
                listing: None,
                error: Some("payment captured, listing not created".to_string()),
                details: Some(reason.clone()),
            }))
        }
        CheckoutState::Failed { reason } => {
            error!("Payment execution failed: {}", reason);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(reason.clone())),
            ))
        }
        // resume always lands in a terminal state
        other => {
            error!("Checkout flow in unexpected state: {:?}", other);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("checkout flow did not complete")),
            ))
        }
    }
}

/// Create a listing directly (no payment leg)
#[instrument(skip(state, draft))]
pub async fn create_listing(
    State(state): State<AppState>,
    Json(draft): Json<ListingDraft>,
) -> Result<(StatusCode, Json<Listing>), (StatusCode, Json<ErrorResponse>)> {
    draft.validate().map_err(market_error_to_response)?;

    let listing = state.store.create_listing(draft).await.map_err(|e| {
        error!("Failed to create listing: {}", e);
        market_error_to_response(e)
    })?;

    info!("Created listing: {}", listing.id);

    Ok((StatusCode::CREATED, Json(listing)))
}

/// Listings for a seller
#[instrument(skip(state))]
pub async fn listings_by_seller(
    State(state): State<AppState>,
    Query(query): Query<ListingsQuery>,
) -> Result<Json<Vec<Listing>>, (StatusCode, Json<ErrorResponse>)> {
    let listings = state
        .store
        .listings_by_seller(&query.seller_id)
        .await
        .map_err(|e| {
            error!("Failed to query listings: {}", e);
            market_error_to_response(e)
        })?;

    Ok(Json(listings))
}

/// Insert the fixed demo listing set
#[instrument(skip(state))]
pub async fn seed(
    State(state): State<AppState>,
) -> Result<Json<SeedResponse>, (StatusCode, Json<ErrorResponse>)> {
    let inserted_ids = seed_sample_listings(state.store.as_ref())
        .await
        .map_err(|e| {
            error!("Seed data error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to seed data")),
            )
        })?;

    Ok(Json(SeedResponse {
        message: format!("Inserted {} sample listings", inserted_ids.len()),
        inserted_ids,
    }))
}

/// Redirect return page. The processor lands here with `paymentId` and
/// `PayerID`; the client reads them and POSTs `/payment/execute`.
pub async fn success_page(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let payment_id = params.get("paymentId").map(|s| s.as_str()).unwrap_or("unknown");
    axum::response::Html(format!(
        r#"
<!DOCTYPE html>
<html>
<head><title>Payment Approved</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0;">
    <div style="padding: 60px; border-radius: 16px; text-align: center; border: 1px solid #ddd;">
        <h1>Payment Approved</h1>
        <p>Payment: <code>{}</code></p>
        <p style="color: #666;">Finalizing your payment...</p>
    </div>
</body>
</html>
"#,
        payment_id
    ))
}

/// Redirect cancel page; reached with no parameters when the buyer
/// aborts before authorizing.
pub async fn cancel_page() -> impl IntoResponse {
    axum::response::Html(
        r#"
<!DOCTYPE html>
<html>
<head><title>Payment Cancelled</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0;">
    <div style="padding: 60px; border-radius: 16px; text-align: center; border: 1px solid #ddd;">
        <h1>Payment Cancelled</h1>
        <p style="color: #666;">No charges were made.</p>
    </div>
</body>
</html>
"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use crate::state::AppConfig;
    use async_trait::async_trait;
    use axum_test::TestServer;
    use market_core::{
        CapturedPayment, Condition, CreatedPayment, MarketResult, PaymentGateway, RedirectUrls,
    };
    use market_store::MemoryListingStore;
    use std::sync::Arc;

    /// Gateway double with canned create/execute outcomes
    struct ScriptedGateway {
        fail_execute: bool,
    }

    #[async_trait]
    impl PaymentGateway for ScriptedGateway {
        async fn create_payment(
            &self,
            items: &[PaymentItem],
            _urls: &RedirectUrls,
        ) -> MarketResult<CreatedPayment> {
            market_core::validate_items(items)?;
            Ok(CreatedPayment {
                id: "PAY-TEST".to_string(),
                approval_url: "https://processor.example/approve/PAY-TEST".to_string(),
            })
        }

        async fn execute_payment(
            &self,
            payment_id: &str,
            _payer_id: &str,
        ) -> MarketResult<CapturedPayment> {
            if self.fail_execute {
                return Err(MarketError::ProviderError {
                    provider: "scripted".to_string(),
                    message: "PAYMENT_NOT_APPROVED_FOR_EXECUTION".to_string(),
                });
            }
            Ok(CapturedPayment {
                id: payment_id.to_string(),
                state: "approved".to_string(),
                raw: serde_json::json!({ "id": payment_id, "state": "approved" }),
            })
        }

        fn provider_name(&self) -> &'static str {
            "scripted"
        }
    }

    /// Store double whose writes always fail (for the partial-failure path)
    struct RejectingStore;

    #[async_trait]
    impl market_core::ListingStore for RejectingStore {
        async fn create_listing(&self, _draft: ListingDraft) -> MarketResult<Listing> {
            Err(MarketError::Storage("insert rejected".to_string()))
        }

        async fn listings_by_seller(&self, _seller_id: &str) -> MarketResult<Vec<Listing>> {
            Ok(vec![])
        }

        async fn insert_many(&self, _drafts: Vec<ListingDraft>) -> MarketResult<Vec<String>> {
            Err(MarketError::Storage("insert rejected".to_string()))
        }

        fn backend_name(&self) -> &'static str {
            "rejecting"
        }
    }

    fn test_state(fail_execute: bool) -> AppState {
        AppState {
            gateway: Arc::new(ScriptedGateway { fail_execute }),
            store: Arc::new(MemoryListingStore::new()),
            urls: RedirectUrls::new("http://localhost:8080"),
            config: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                base_url: "http://localhost:8080".to_string(),
                environment: "test".to_string(),
            },
        }
    }

    fn server(state: AppState) -> TestServer {
        TestServer::new(create_router(state)).expect("test server")
    }

    fn draft_json() -> serde_json::Value {
        serde_json::json!({
            "title": "Desk Lamp",
            "description": "Barely used.",
            "price": 12.0,
            "category": "furniture",
            "condition": "good",
            "location": "Student Center",
            "images": [],
            "tags": [],
            "sellerId": "user1",
            "seller": {
                "id": "user1",
                "name": "John Smith",
                "university": "State University",
                "rating": 4.8
            }
        })
    }

    #[tokio::test]
    async fn create_payment_returns_id_and_url() {
        let server = server(test_state(false));

        let response = server
            .post("/payment/create")
            .json(&serde_json::json!({
                "items": [{ "id": "1", "name": "Book", "price": 85.0, "quantity": 1 }]
            }))
            .await;

        response.assert_status_ok();
        let body: CreatePaymentResponse = response.json();
        assert_eq!(body.id, "PAY-TEST");
        assert!(body.url.contains("approve"));
    }

    #[tokio::test]
    async fn create_payment_rejects_empty_items() {
        let server = server(test_state(false));

        let response = server
            .post("/payment/create")
            .json(&serde_json::json!({ "items": [] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert!(body.error.contains("Invalid"));
    }

    #[tokio::test]
    async fn execute_payment_buy_flow() {
        let server = server(test_state(false));

        let response = server
            .post("/payment/execute")
            .json(&serde_json::json!({ "paymentId": "PAY-TEST", "PayerID": "PAYER-7" }))
            .await;

        response.assert_status_ok();
        let body: ExecutePaymentResponse = response.json();
        assert!(body.success);
        assert!(body.listing.is_none());
        assert!(body.error.is_none());
        assert_eq!(body.payment["state"], "approved");
    }

    #[tokio::test]
    async fn execute_payment_sell_flow_publishes_listing() {
        let state = test_state(false);
        let store = state.store.clone();
        let server = server(state);

        let response = server
            .post("/payment/execute")
            .json(&serde_json::json!({
                "paymentId": "PAY-TEST",
                "PayerID": "PAYER-7",
                "listing": draft_json()
            }))
            .await;

        response.assert_status_ok();
        let body: ExecutePaymentResponse = response.json();
        assert!(body.success);
        let listing = body.listing.expect("sell flow returns the listing");
        assert_eq!(listing.title, "Desk Lamp");

        // And the listing is retrievable
        let found = store.listings_by_seller("user1").await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn execute_payment_partial_failure_is_distinct() {
        let mut state = test_state(false);
        state.store = Arc::new(RejectingStore);
        let server = server(state);

        let response = server
            .post("/payment/execute")
            .json(&serde_json::json!({
                "paymentId": "PAY-TEST",
                "PayerID": "PAYER-7",
                "listing": draft_json()
            }))
            .await;

        // Payment captured: this is NOT an HTTP error
        response.assert_status_ok();
        let body: ExecutePaymentResponse = response.json();
        assert!(body.success);
        assert!(body.listing.is_none());
        assert_eq!(
            body.error.as_deref(),
            Some("payment captured, listing not created")
        );
    }

    #[tokio::test]
    async fn execute_payment_processor_rejection_is_500() {
        let server = server(test_state(true));

        let response = server
            .post("/payment/execute")
            .json(&serde_json::json!({ "paymentId": "PAY-TEST", "PayerID": "PAYER-7" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = response.json();
        assert!(body.error.contains("PAYMENT_NOT_APPROVED_FOR_EXECUTION"));
    }

    #[tokio::test]
    async fn listing_round_trip_via_api() {
        let server = server(test_state(false));

        let created = server.post("/listings").json(&draft_json()).await;
        created.assert_status(StatusCode::CREATED);
        let listing: Listing = created.json();
        assert!(!listing.id.is_empty());

        let found = server.get("/listings").add_query_param("sellerId", "user1").await;
        found.assert_status_ok();
        let listings: Vec<Listing> = found.json();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, listing.id);
    }

    #[tokio::test]
    async fn create_listing_rejects_invalid_draft() {
        let server = server(test_state(false));

        let mut bad = draft_json();
        bad["price"] = serde_json::json!(-5.0);

        let response = server.post("/listings").json(&bad).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn seed_inserts_sample_listings() {
        let server = server(test_state(false));

        let response = server.post("/seed").await;
        response.assert_status_ok();
        let body: SeedResponse = response.json();
        assert_eq!(body.inserted_ids.len(), 2);
        assert!(body.message.contains("2"));
    }

    #[tokio::test]
    async fn success_page_echoes_payment_id() {
        let server = server(test_state(false));

        let response = server
            .get("/success")
            .add_query_param("paymentId", "PAY-TEST")
            .add_query_param("PayerID", "PAYER-7")
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("PAY-TEST"));
    }

    #[tokio::test]
    async fn cancel_page_reports_no_charges() {
        let server = server(test_state(false));

        let response = server.get("/cancel").await;
        response.assert_status_ok();
        assert!(response.text().contains("No charges were made"));
    }

    #[test]
    fn sell_draft_condition_uses_kebab_case() {
        let draft: ListingDraft = serde_json::from_value(draft_json()).unwrap();
        assert_eq!(draft.condition, Condition::Good);
        assert_eq!(draft.seller.id, "user1");
    }
}
