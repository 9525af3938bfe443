//! Placing orders and reading order history.
//!
//! Run with: cargo test -p happy-store-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use serde_json::json;

use happy_store_integration_tests::{
    add_to_cart, any_product, expect_json, register, session_client, storefront_url,
    unique_email, valid_address,
};

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_place_order_empties_cart_and_lists_history() {
    let client = session_client();
    let email = unique_email();
    let (product, size) = any_product(&client).await;

    register(&client, &email).await;
    add_to_cart(&client, product, &size).await;
    add_to_cart(&client, product, &size).await;

    let body = expect_json(
        client
            .post(format!("{}/api/order/place", storefront_url()))
            .json(&json!({ "address": valid_address(&email), "payment_method": "cod" }))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await;
    assert_eq!(body["message"], "Order Placed");
    assert_eq!(body["order"]["status"], "Order Placed");
    assert_eq!(body["order"]["payment"], false);
    let order_id = body["order"]["id"].as_i64().unwrap();

    let cart = expect_json(
        client
            .get(format!("{}/api/cart", storefront_url()))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await;
    assert_eq!(cart["count"], 0);

    let history = expect_json(
        client
            .get(format!("{}/api/order/userorders", storefront_url()))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await;
    let rows = history["orders"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["order_id"].as_i64(), Some(order_id));
    assert_eq!(rows[0]["quantity"], 2);
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_empty_cart_cannot_be_ordered() {
    let client = session_client();
    let email = unique_email();
    register(&client, &email).await;

    let body = expect_json(
        client
            .post(format!("{}/api/order/place", storefront_url()))
            .json(&json!({ "address": valid_address(&email), "payment_method": "stripe" }))
            .send()
            .await
            .unwrap(),
        400,
    )
    .await;
    assert_eq!(body["message"], "Your cart is empty");
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_invalid_address_lists_every_problem() {
    let client = session_client();
    let email = unique_email();
    let (product, size) = any_product(&client).await;
    register(&client, &email).await;
    add_to_cart(&client, product, &size).await;

    let mut address = valid_address(&email);
    address["first_name"] = json!("   ");
    address["phone"] = json!("12345");

    let body = expect_json(
        client
            .post(format!("{}/api/order/place", storefront_url()))
            .json(&json!({ "address": address, "payment_method": "cod" }))
            .send()
            .await
            .unwrap(),
        400,
    )
    .await;
    assert_eq!(
        body["errors"],
        json!(["First name is required.", "Phone number must be exactly 10 digits."])
    );
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_guest_cannot_place_order() {
    let client = session_client();
    let response = client
        .post(format!("{}/api/order/place", storefront_url()))
        .json(&json!({ "address": valid_address("guest@happystore.test"), "payment_method": "cod" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}
