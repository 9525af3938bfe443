//! Admin order management against a running admin server.
//!
//! Needs `ADMIN_EMAIL` and `ADMIN_PASSWORD` matching the admin's
//! configuration.
//!
//! Run with: cargo test -p happy-store-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::Client;
use serde_json::json;

use happy_store_integration_tests::{
    add_to_cart, admin_url, any_product, expect_json, register, session_client, storefront_url,
    unique_email, valid_address,
};

async fn admin_client() -> Client {
    let client = session_client();
    let email = std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL not set");
    let password = std::env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD not set");

    expect_json(
        client
            .post(format!("{}/api/admin/login", admin_url()))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await;
    client
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_admin_routes_require_login() {
    let response = session_client()
        .get(format!("{}/api/order/list", admin_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
#[ignore = "Requires running storefront, admin server and seeded database"]
async fn test_status_update_visible_to_customer() {
    let customer = session_client();
    let email = unique_email();
    let (product, size) = any_product(&customer).await;
    register(&customer, &email).await;
    add_to_cart(&customer, product, &size).await;

    let placed = expect_json(
        customer
            .post(format!("{}/api/order/place", storefront_url()))
            .json(&json!({ "address": valid_address(&email), "payment_method": "cod" }))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await;
    let order_id = placed["order"]["id"].as_i64().unwrap();

    let admin = admin_client().await;
    let body = expect_json(
        admin
            .post(format!("{}/api/order/status", admin_url()))
            .json(&json!({ "order_id": order_id, "status": "Shipped" }))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await;
    assert_eq!(body["success"], true);

    let history = expect_json(
        customer
            .get(format!("{}/api/order/userorders", storefront_url()))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await;
    assert_eq!(history["orders"][0]["status"], "Shipped");
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_unknown_order_status_update_not_found() {
    let admin = admin_client().await;
    let response = admin
        .post(format!("{}/api/order/status", admin_url()))
        .json(&json!({ "order_id": i32::MAX, "status": "Packing" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "Requires running storefront and admin server"]
async fn test_added_product_appears_in_storefront() {
    let admin = admin_client().await;
    let name = format!("Integration Tee {}", uuid::Uuid::new_v4().simple());

    let body = expect_json(
        admin
            .post(format!("{}/api/product/add", admin_url()))
            .json(&json!({
                "name": name,
                "price": "499",
                "category": "Kids",
                "sub_category": "Topwear",
                "sizes": ["S", "M", "S"],
                "images": ["https://images.happystore.test/tee.jpg"]
            }))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await;
    let id = body["product"]["id"].as_i64().unwrap();
    assert_eq!(body["product"]["sizes"], json!(["S", "M"]));

    // The storefront catalog cache may lag by its TTL
    let detail = session_client()
        .get(format!("{}/api/product/{id}", storefront_url()))
        .send()
        .await
        .unwrap();
    assert!(matches!(detail.status().as_u16(), 200 | 404));

    expect_json(
        admin
            .post(format!("{}/api/product/remove", admin_url()))
            .json(&json!({ "id": id }))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await;
}
