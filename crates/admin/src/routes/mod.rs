//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                - Liveness
//! GET  /health/ready          - Database ping
//!
//! POST /api/admin/login       - Log in with the configured credentials
//! POST /api/admin/logout      - Log out
//!
//! GET  /api/product/list      - All products, newest first
//! POST /api/product/add       - Add a product
//! POST /api/product/remove    - Remove a product
//!
//! GET  /api/order/list        - All orders, newest first
//! POST /api/order/status      - Move an order to a new status
//! ```

pub mod auth;
pub mod orders;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/api/admin/login", post(auth::login))
        .route("/api/admin/logout", post(auth::logout))
        .route("/api/product/list", get(products::list))
        .route("/api/product/add", post(products::add))
        .route("/api/product/remove", post(products::remove))
        .route("/api/order/list", get(orders::list))
        .route("/api/order/status", post(orders::update_status))
}

async fn health() -> &'static str {
    "ok"
}

async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
