//! # Student Market
//!
//! Campus marketplace transaction server.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PAYPAL_CLIENT_ID=...
//! export PAYPAL_CLIENT_SECRET=...
//! export MONGODB_URI=mongodb+srv://...   # optional, memory fallback
//!
//! # Run the server
//! student-market
//! ```

use market_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new().await?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.gateway.provider_name());
    info!("Listing store: {}", state.store.backend_name());

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Student Market starting on http://{}", addr);

    if !is_prod {
        info!("Health: GET http://{}/health", addr);
        info!("Create payment: POST http://{}/payment/create", addr);
        info!("Execute payment: POST http://{}/payment/execute", addr);
        info!("Listings: GET http://{}/listings?sellerId=user1", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
