//! Happy Store Storefront library.
//!
//! The customer-facing JSON API: catalog browsing, reviews, accounts, carts,
//! checkout and favourites. Exposed as a library so the router can be
//! exercised in tests without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the storefront router with its middleware stack.
///
/// Sentry layers are added by the binary so tests run without a hub.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.pool(), state.config());
    let cors = middleware::cors_layer(state.config().frontend_origin.as_deref());

    routes::routes()
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(cors)
        // Request ID runs inside the span created by TraceLayer
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::make_request_span::<axum::body::Body>),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;
    use sqlx::PgPool;
    use tower::ServiceExt;

    use happy_store_core::{Catalog, Category, Money, Product, ProductId, Size, SubCategory};

    use super::*;
    use crate::config::tests::test_config;

    fn product(id: i32, name: &str, price: i64, bestseller: bool) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: String::new(),
            price: Money::from_major(price),
            images: vec![format!("https://img.example.com/{id}.jpg")],
            category: Category::Women,
            sub_category: SubCategory::Topwear,
            sizes: vec![Size::S, Size::M],
            bestseller,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(i64::from(id)),
        }
    }

    async fn test_app() -> Router {
        let pool = PgPool::connect_lazy("postgres://localhost/happy_store_test").unwrap();
        let state = AppState::new(test_config(), pool);
        state
            .prime_catalog(Catalog::new(vec![
                product(1, "Cotton Tee", 400, true),
                product(2, "Silk Blouse", 1200, false),
                product(3, "Denim Shirt", 800, true),
            ]))
            .await;
        app(state)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("x-forwarded-for", "203.0.113.10")
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("x-forwarded-for", "203.0.113.10")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app().await.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_latest_products_newest_first() {
        let response = test_app()
            .await
            .oneshot(get("/api/product/latest?limit=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["success"], true);
        let names: Vec<&str> = body["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Denim Shirt", "Silk Blouse"]);
    }

    #[tokio::test]
    async fn test_list_sorted_by_price() {
        let body = json(
            test_app()
                .await
                .oneshot(get("/api/product/list?category=Women&sort=high-low"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["products"][0]["name"], "Silk Blouse");
        assert_eq!(body["products"][2]["name"], "Cotton Tee");
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_category() {
        let response = test_app()
            .await
            .oneshot(get("/api/product/list?category=Pets"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let response = test_app()
            .await
            .oneshot(get("/api/product/42"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(response).await["message"], "Product not found");
    }

    #[tokio::test]
    async fn test_related_excludes_the_product() {
        let body = json(
            test_app()
                .await
                .oneshot(get("/api/product/1/related"))
                .await
                .unwrap(),
        )
        .await;
        let ids: Vec<i64> = body["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, [3, 2]);
    }

    #[tokio::test]
    async fn test_order_history_requires_login() {
        let response = test_app()
            .await
            .oneshot(get("/api/order/userorders"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_add_without_picked_size_asks_for_size() {
        let response = test_app()
            .await
            .oneshot(post_json("/api/cart/add", r#"{"item_id": 1, "size": ""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Select Product Size");
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let response = test_app()
            .await
            .oneshot(post_json("/api/cart/add", r#"{"item_id": "one"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("item_id"));
    }

    #[tokio::test]
    async fn test_invalid_json_syntax_is_bad_request() {
        let response = test_app()
            .await
            .oneshot(post_json("/api/cart/add", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["success"], false);
    }
}
