//! Order route handlers.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use happy_store_core::{DeliveryAddress, Order, OrderHistoryRow, PaymentMethod};

use super::{JsonBody, Success};
use crate::db::OrderRepository;
use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::services::CheckoutService;
use crate::state::AppState;

/// Items and amounts are never read from the request; the order is built
/// from the stored cart.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub address: DeliveryAddress,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Serialize)]
pub struct PlacedBody {
    pub message: &'static str,
    pub order: Order,
}

#[derive(Debug, Serialize)]
pub struct HistoryBody {
    pub orders: Vec<OrderHistoryRow>,
}

/// Place an order from the logged-in user's cart.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn place(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    JsonBody(req): JsonBody<PlaceOrderRequest>,
) -> Result<Success<PlacedBody>> {
    let catalog = state.catalog().await?;
    let order = CheckoutService::new(state.pool(), &session)
        .place_order(
            user.id,
            &catalog,
            state.delivery_fee(),
            req.address,
            req.payment_method,
        )
        .await?;

    add_breadcrumb(
        "order",
        "Order placed",
        &[
            ("order_id", order.id.to_string().as_str()),
            ("payment_method", order.payment_method.as_str()),
        ],
    );

    Ok(Success(PlacedBody {
        message: "Order Placed",
        order,
    }))
}

/// Order history, one row per ordered item, newest first.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Success<HistoryBody>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Success(HistoryBody {
        orders: Order::flatten_for_history(&orders),
    }))
}
