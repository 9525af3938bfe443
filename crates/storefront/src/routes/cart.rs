//! Cart route handlers.
//!
//! The same endpoints serve guests and logged-in users; `CartOwner` decides
//! whether the session or the account row is written.

use axum::extract::State;
use serde::{Deserialize, Deserializer, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use happy_store_core::{CartOwner, ProductId, Size};

use super::{JsonBody, Success};
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::services::{CartService, CartView};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub item_id: ProductId,
    /// Missing or blank sizes are rejected with "Select Product Size".
    #[serde(default, deserialize_with = "blank_as_none")]
    pub size: Option<Size>,
}

/// Clients send `""` until a size is picked.
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<Size>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => label.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub item_id: ProductId,
    pub size: Size,
    /// Zero or negative removes the entry.
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct CartBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(flatten)]
    pub cart: CartView,
}

fn owner(user: Option<&crate::models::CurrentUser>) -> CartOwner {
    CartOwner::from(user.map(|u| u.id))
}

/// Current cart with priced lines and totals.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<Success<CartBody>> {
    let cart = CartService::new(state.pool(), &session)
        .current(owner(user.as_ref()))
        .await?;
    let catalog = state.catalog().await?;

    Ok(Success(CartBody {
        message: None,
        cart: CartView::build(cart, &catalog, state.delivery_fee()),
    }))
}

/// Add one unit of a product in a size.
#[instrument(skip(state, user, session))]
pub async fn add(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    JsonBody(req): JsonBody<AddRequest>,
) -> Result<Success<CartBody>> {
    let catalog = state.catalog().await?;
    let cart = CartService::new(state.pool(), &session)
        .add(owner(user.as_ref()), &catalog, req.item_id, req.size)
        .await?;

    Ok(Success(CartBody {
        message: Some("Added To Cart"),
        cart: CartView::build(cart, &catalog, state.delivery_fee()),
    }))
}

/// Set the quantity of one cart entry.
#[instrument(skip(state, user, session))]
pub async fn update(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    JsonBody(req): JsonBody<UpdateRequest>,
) -> Result<Success<CartBody>> {
    let catalog = state.catalog().await?;
    let cart = CartService::new(state.pool(), &session)
        .update(
            owner(user.as_ref()),
            &catalog,
            req.item_id,
            req.size,
            req.quantity,
        )
        .await?;

    Ok(Success(CartBody {
        message: Some("Cart Updated"),
        cart: CartView::build(cart, &catalog, state.delivery_fee()),
    }))
}
