//! Favourite toggling.
//!
//! Run with: cargo test -p happy-store-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::Client;
use serde_json::{Value, json};

use happy_store_integration_tests::{
    any_product, expect_json, register, session_client, storefront_url, unique_email,
};

async fn toggle(client: &Client, product: i64) -> Value {
    expect_json(
        client
            .post(format!("{}/api/favourite/toggle", storefront_url()))
            .json(&json!({ "product_id": product }))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await
}

fn holds(body: &Value, product: i64) -> bool {
    body["favourites"]
        .as_array()
        .unwrap()
        .iter()
        .any(|id| id.as_i64() == Some(product))
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_toggle_adds_then_removes() {
    let client = session_client();
    let (product, _) = any_product(&client).await;
    register(&client, &unique_email()).await;

    let body = toggle(&client, product).await;
    assert_eq!(body["favourited"], true);
    assert!(holds(&body, product));

    let body = toggle(&client, product).await;
    assert_eq!(body["favourited"], false);
    assert!(!holds(&body, product));
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_concurrent_toggles_apply_one_after_another() {
    let client = session_client();
    let (product, _) = any_product(&client).await;
    register(&client, &unique_email()).await;

    let (first, second) = tokio::join!(toggle(&client, product), toggle(&client, product));

    // One toggle added the product and the other removed it
    assert_ne!(first["favourited"], second["favourited"]);

    let body = expect_json(
        client
            .get(format!("{}/api/favourite", storefront_url()))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await;
    assert!(!holds(&body, product));
}
