//! Guest and account carts across login and logout.
//!
//! Run with: cargo test -p happy-store-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use happy_store_integration_tests::{
    add_to_cart, any_product, expect_json, login, quantity, register, session_client,
    storefront_url, unique_email,
};

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_guest_cart_survives_in_session() {
    let client = session_client();
    let (product, size) = any_product(&client).await;

    add_to_cart(&client, product, &size).await;
    add_to_cart(&client, product, &size).await;

    let body = expect_json(
        client
            .get(format!("{}/api/cart", storefront_url()))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await;
    assert_eq!(quantity(&body["cart"], product, &size), 2);
    assert_eq!(body["count"], 2);
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_login_merges_guest_cart_into_account() {
    let email = unique_email();
    let (product, size) = any_product(&session_client()).await;

    // Leave one unit on the account, then log out
    let first = session_client();
    register(&first, &email).await;
    add_to_cart(&first, product, &size).await;
    expect_json(
        first
            .post(format!("{}/api/user/logout", storefront_url()))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await;

    // A different browser builds a guest cart and logs in
    let second = session_client();
    add_to_cart(&second, product, &size).await;
    add_to_cart(&second, product, &size).await;
    let body = expect_json(login(&second, &email).await, 200).await;
    assert_eq!(quantity(&body["cart"], product, &size), 3);

    // The account now holds the merged cart everywhere
    let third = session_client();
    let body = expect_json(login(&third, &email).await, 200).await;
    assert_eq!(quantity(&body["cart"], product, &size), 3);
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_logout_then_login_in_same_browser_keeps_quantities() {
    let client = session_client();
    let email = unique_email();
    let (product, size) = any_product(&client).await;

    register(&client, &email).await;
    add_to_cart(&client, product, &size).await;

    for _ in 0..2 {
        expect_json(
            client
                .post(format!("{}/api/user/logout", storefront_url()))
                .send()
                .await
                .unwrap(),
            200,
        )
        .await;
        let body = expect_json(login(&client, &email).await, 200).await;
        assert_eq!(quantity(&body["cart"], product, &size), 1);
    }

    // Logging in again while logged in changes nothing either
    let body = expect_json(login(&client, &email).await, 200).await;
    assert_eq!(quantity(&body["cart"], product, &size), 1);

    // Only what was added while logged out is merged
    client
        .post(format!("{}/api/user/logout", storefront_url()))
        .send()
        .await
        .unwrap();
    add_to_cart(&client, product, &size).await;
    let body = expect_json(login(&client, &email).await, 200).await;
    assert_eq!(quantity(&body["cart"], product, &size), 2);
}

#[tokio::test]
#[ignore = "Requires running storefront and seeded database"]
async fn test_logout_leaves_snapshot_as_guest_cart() {
    let client = session_client();
    let (product, size) = any_product(&client).await;

    register(&client, &unique_email()).await;
    add_to_cart(&client, product, &size).await;
    client
        .post(format!("{}/api/user/logout", storefront_url()))
        .send()
        .await
        .unwrap();

    let body = expect_json(
        client
            .get(format!("{}/api/cart", storefront_url()))
            .send()
            .await
            .unwrap(),
        200,
    )
    .await;
    assert_eq!(quantity(&body["cart"], product, &size), 1);
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_add_without_size_rejected() {
    let client = session_client();
    let (product, _) = any_product(&client).await;

    let body = expect_json(
        client
            .post(format!("{}/api/cart/add", storefront_url()))
            .json(&serde_json::json!({ "item_id": product }))
            .send()
            .await
            .unwrap(),
        400,
    )
    .await;
    assert_eq!(body["message"], "Select Product Size");
}
