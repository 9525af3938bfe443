//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness
//! GET  /health/ready                    - Database ping
//!
//! # Products
//! GET  /api/product/list                - Filtered, sorted collection
//! GET  /api/product/latest              - Newest products
//! GET  /api/product/bestsellers         - Bestseller rail
//! GET  /api/product/top                 - Top products in a category
//! GET  /api/product/{id}                - Product detail
//! GET  /api/product/{id}/related        - Same category and sub-category
//!
//! # Reviews
//! GET  /api/product/{id}/reviews        - Reviews, optionally by star rating
//! GET  /api/product/{id}/reviews/summary - Average and distribution
//! POST /api/product/{id}/reviews        - Post a review (auth)
//!
//! # User
//! POST /api/user/register               - Register and log in
//! POST /api/user/login                  - Log in
//! POST /api/user/logout                 - Log out
//! GET  /api/user/me                     - Current user (auth)
//!
//! # Cart
//! GET  /api/cart                        - Cart, lines and totals
//! POST /api/cart/add                    - Add one unit
//! POST /api/cart/update                 - Set a quantity
//!
//! # Orders (auth)
//! POST /api/order/place                 - Place an order from the cart
//! GET  /api/order/userorders            - Order history, one row per item
//!
//! # Favourites (auth)
//! GET  /api/favourite                   - Favourite products
//! POST /api/favourite/toggle            - Add or remove a favourite
//! ```

pub mod cart;
pub mod favourites;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod user;

use axum::{
    Json, Router,
    extract::{FromRequest, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Successful JSON response: the payload's fields plus `"success": true`.
///
/// Payloads that do not serialize to an object are placed under `"data"`.
pub struct Success<T>(pub T);

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(self.0) {
            Ok(Value::Object(mut body)) => {
                body.insert("success".to_owned(), Value::Bool(true));
                Json(Value::Object(body)).into_response()
            }
            Ok(data) => Json(serde_json::json!({ "success": true, "data": data })).into_response(),
            Err(err) => AppError::Internal(format!("response serialization: {err}")).into_response(),
        }
    }
}

/// JSON request body. Malformed bodies are rejected with the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Plain acknowledgement body.
#[derive(Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// Create the product and review routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(products::list))
        .route("/latest", get(products::latest))
        .route("/bestsellers", get(products::bestsellers))
        .route("/top", get(products::top))
        .route("/{id}", get(products::show))
        .route("/{id}/related", get(products::related))
        .route("/{id}/reviews", get(reviews::list).post(reviews::create))
        .route("/{id}/reviews/summary", get(reviews::summary))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(user::register))
        .route("/login", post(user::login))
        .route("/logout", post(user::logout))
        .route("/me", get(user::me))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/place", post(orders::place))
        .route("/userorders", get(orders::history))
}

/// Create the favourite routes router.
pub fn favourite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favourites::list))
        .route("/toggle", post(favourites::toggle))
}

/// Create all `/api` routes, each group with its rate limiter.
pub fn api_routes() -> Router<AppState> {
    let relaxed = Router::new()
        .nest("/product", product_routes())
        .nest("/cart", cart_routes())
        .nest("/order", order_routes())
        .nest("/favourite", favourite_routes())
        .layer(api_rate_limiter());

    Router::new()
        .nest("/user", user_routes().layer(auth_rate_limiter()))
        .merge(relaxed)
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Clamp a requested list size, falling back to `default`.
pub(crate) fn limit_or(requested: Option<usize>, default: usize) -> usize {
    const MAX_LIMIT: usize = 50;
    requested.unwrap_or(default).clamp(1, MAX_LIMIT)
}
