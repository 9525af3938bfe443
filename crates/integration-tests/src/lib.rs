//! Integration tests for Happy Store.
//!
//! These tests drive running servers over HTTP and are `#[ignore]`d by
//! default. They need:
//!
//! - A migrated and seeded database (`hs-cli migrate && hs-cli seed`)
//! - The storefront (`cargo run -p happy-store-storefront`)
//! - The admin (`cargo run -p happy-store-admin`) for the admin tests
//!
//! ```bash
//! cargo test -p happy-store-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_URL` - defaults to `http://localhost:4000`
//! - `ADMIN_URL` - defaults to `http://localhost:4001`
//! - `ADMIN_EMAIL`, `ADMIN_PASSWORD` - admin credentials for the admin tests

use reqwest::{Client, Response};
use serde_json::{Value, json};

/// Base URL for the storefront API.
#[must_use]
pub fn storefront_url() -> String {
    std::env::var("STOREFRONT_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// Base URL for the admin API.
#[must_use]
pub fn admin_url() -> String {
    std::env::var("ADMIN_URL").unwrap_or_else(|_| "http://localhost:4001".to_string())
}

/// A client that keeps cookies, so each one is a separate browser session.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// An email address no other test run has used.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@happystore.test", uuid::Uuid::new_v4().simple())
}

/// Parse a response body, asserting the expected status first.
///
/// # Panics
///
/// Panics if the status differs or the body is not JSON.
pub async fn expect_json(response: Response, status: u16) -> Value {
    let actual = response.status().as_u16();
    let body: Value = response.json().await.expect("Response was not JSON");
    assert_eq!(actual, status, "unexpected status, body: {body}");
    body
}

/// A product from the catalog with one of its sizes.
///
/// # Panics
///
/// Panics if the catalog is empty.
pub async fn any_product(client: &Client) -> (i64, String) {
    let body = expect_json(
        client
            .get(format!("{}/api/product/latest?limit=1", storefront_url()))
            .send()
            .await
            .expect("Failed to list products"),
        200,
    )
    .await;

    let product = &body["products"][0];
    let id = product["id"].as_i64().expect("Catalog is empty; run hs-cli seed");
    let size = product["sizes"][0].as_str().expect("Product has no sizes");
    (id, size.to_string())
}

/// Register a fresh customer on `client`'s session.
///
/// # Panics
///
/// Panics if registration fails.
pub async fn register(client: &Client, email: &str) -> Value {
    expect_json(
        client
            .post(format!("{}/api/user/register", storefront_url()))
            .json(&json!({ "name": "Integration Test", "email": email, "password": "integration-pass" }))
            .send()
            .await
            .expect("Failed to register"),
        200,
    )
    .await
}

/// Log in as an existing customer on `client`'s session.
///
/// # Panics
///
/// Panics if the request cannot be sent.
pub async fn login(client: &Client, email: &str) -> Response {
    client
        .post(format!("{}/api/user/login", storefront_url()))
        .json(&json!({ "email": email, "password": "integration-pass" }))
        .send()
        .await
        .expect("Failed to log in")
}

/// Add one unit of `(product, size)` to `client`'s cart.
///
/// # Panics
///
/// Panics if the add is rejected.
pub async fn add_to_cart(client: &Client, product: i64, size: &str) -> Value {
    expect_json(
        client
            .post(format!("{}/api/cart/add", storefront_url()))
            .json(&json!({ "item_id": product, "size": size }))
            .send()
            .await
            .expect("Failed to add to cart"),
        200,
    )
    .await
}

/// Quantity of `(product, size)` in a serialized cart map.
#[must_use]
pub fn quantity(cart: &Value, product: i64, size: &str) -> u64 {
    cart[product.to_string()][size].as_u64().unwrap_or(0)
}

/// A delivery address that passes validation.
#[must_use]
pub fn valid_address(email: &str) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": email,
        "street": "12 Analytical Row",
        "city": "London",
        "state": "",
        "zipcode": "400001",
        "country": "UK",
        "phone": "5551234567"
    })
}
