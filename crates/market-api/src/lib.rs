//! # market-api
//!
//! HTTP API layer for student-market.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for the payment round trip and listings
//! - The success/cancel pages the processor redirects back to
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/payment/create` | Create a payment, returns approval URL |
//! | POST | `/payment/execute` | Execute an approved payment |
//! | POST | `/listings` | Create a listing |
//! | GET | `/listings?sellerId=...` | Listings by seller |
//! | POST | `/seed` | Insert the demo listing set |
//! | GET | `/success` | Redirect return page |
//! | GET | `/cancel` | Redirect cancel page |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
