//! Catalog management handlers.
//!
//! New products reach the storefront once its catalog cache expires.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use happy_store_core::ProductId;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::ProductForm;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub id: ProductId,
}

/// All products, newest first.
#[instrument(skip_all)]
pub async fn list(State(state): State<AppState>, _admin: RequireAdmin) -> Result<Json<Value>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(json!({ "success": true, "products": products })))
}

/// Validate and insert a product.
#[instrument(skip_all, fields(name = %form.name))]
pub async fn add(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(form): Json<ProductForm>,
) -> Result<Json<Value>> {
    let product = form.validate()?;
    let product = ProductRepository::new(state.pool()).create(&product).await?;
    info!(product_id = %product.id, "Product added");

    Ok(Json(
        json!({ "success": true, "message": "Product Added", "product": product }),
    ))
}

/// Delete a product by id.
#[instrument(skip(state, _admin))]
pub async fn remove(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(req): Json<RemoveRequest>,
) -> Result<Json<Value>> {
    ProductRepository::new(state.pool()).delete(req.id).await?;
    info!(product_id = %req.id, "Product removed");

    Ok(Json(json!({ "success": true, "message": "Product Removed" })))
}
