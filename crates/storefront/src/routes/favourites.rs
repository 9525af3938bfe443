//! Favourite product route handlers.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use happy_store_core::{Favourites, Product, ProductId};

use super::{JsonBody, Success};
use crate::db::FavouriteRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub product_id: ProductId,
}

#[derive(Debug, Serialize)]
pub struct FavouritesBody {
    pub favourites: Favourites,
    /// Favourites still in the catalog, in favourite order.
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ToggledBody {
    /// Whether the product is now a favourite.
    pub favourited: bool,
    pub favourites: Favourites,
}

/// The logged-in user's favourites.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Success<FavouritesBody>> {
    let favourites = FavouriteRepository::new(state.pool()).list(user.id).await?;
    let catalog = state.catalog().await?;
    let products = favourites
        .iter()
        .filter_map(|id| catalog.find(id).cloned())
        .collect();

    Ok(Success(FavouritesBody {
        favourites,
        products,
    }))
}

/// Add a product to favourites, or remove it if already there.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn toggle(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(req): JsonBody<ToggleRequest>,
) -> Result<Success<ToggledBody>> {
    let product = req.product_id;
    if state.catalog().await?.find(product).is_none() {
        return Err(AppError::NotFound("Product not found".to_owned()));
    }

    let (favourited, favourites) = FavouriteRepository::new(state.pool())
        .toggle(user.id, product)
        .await?;
    debug!(product_id = %product, favourited, "Favourite toggled");

    Ok(Success(ToggledBody {
        favourited,
        favourites,
    }))
}
