//! Order management handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use happy_store_core::{OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub order_id: OrderId,
    /// One of the status labels, e.g. `"Out for delivery"`.
    pub status: OrderStatus,
}

/// All orders, newest first.
#[instrument(skip_all)]
pub async fn list(State(state): State<AppState>, _admin: RequireAdmin) -> Result<Json<Value>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(Json(json!({ "success": true, "orders": orders })))
}

/// Move an order to a new status.
#[instrument(skip(state, _admin))]
pub async fn update_status(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Value>> {
    let order = OrderRepository::new(state.pool())
        .update_status(req.order_id, req.status)
        .await?;
    info!(order_id = %order.id, status = %order.status, "Order status updated");

    Ok(Json(
        json!({ "success": true, "message": "Status Updated", "order": order }),
    ))
}
