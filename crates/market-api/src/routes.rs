//! # Routes
//!
//! Axum router configuration for the marketplace API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Payments:
///   - POST /payment/create - Create a payment, returns the approval URL
///   - POST /payment/execute - Execute an approved payment
///
/// - Listings:
///   - POST /listings - Create a listing
///   - GET  /listings?sellerId=... - Listings for a seller
///   - POST /seed - Insert the demo listing set
///
/// - Static pages:
///   - GET /success - Redirect return page
///   - GET /cancel - Redirect cancel page
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - allow all origins; this serves a browser
    // client on a different dev port
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let payment_routes = Router::new()
        .route("/create", post(handlers::create_payment))
        .route("/execute", post(handlers::execute_payment));

    let listing_routes = Router::new()
        .route(
            "/listings",
            post(handlers::create_listing).get(handlers::listings_by_seller),
        )
        .route("/seed", post(handlers::seed));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // Payment round trip
        .nest("/payment", payment_routes)
        // Listings
        .merge(listing_routes)
        // Redirect landing pages
        .route("/success", get(handlers::success_page))
        .route("/cancel", get(handlers::cancel_page))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
