//! Review route handlers.

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use happy_store_core::review::{MAX_RATING, MIN_RATING, filter_by_rating};
use happy_store_core::{NewReview, ProductId, Review, ReviewError, ReviewSummary};

use super::{JsonBody, Success};
use crate::db::ReviewRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReviewParams {
    /// Only show reviews with exactly this many stars.
    pub rating: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct ReviewList {
    pub reviews: Vec<Review>,
}

#[derive(Debug, Serialize)]
pub struct SummaryBody {
    pub summary: ReviewSummary,
}

#[derive(Debug, Serialize)]
pub struct ReviewBody {
    pub message: &'static str,
    pub review: Review,
}

/// Reviews disappear with their product, so check the catalog first.
async fn ensure_listed(state: &AppState, id: ProductId) -> Result<()> {
    if state.catalog().await?.find(id).is_none() {
        return Err(AppError::NotFound("Product not found".to_owned()));
    }
    Ok(())
}

/// Reviews for a product, newest first.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Query(params): Query<ReviewParams>,
) -> Result<Success<ReviewList>> {
    if let Some(rating) = params.rating
        && !(MIN_RATING..=MAX_RATING).contains(&rating)
    {
        return Err(ReviewError::RatingOutOfRange(rating).into());
    }
    ensure_listed(&state, id).await?;

    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(id)
        .await?;
    let reviews = filter_by_rating(&reviews, params.rating)
        .into_iter()
        .cloned()
        .collect();
    Ok(Success(ReviewList { reviews }))
}

/// Review count, average and star distribution.
#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Success<SummaryBody>> {
    ensure_listed(&state, id).await?;

    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(id)
        .await?;
    Ok(Success(SummaryBody {
        summary: ReviewSummary::from_reviews(&reviews),
    }))
}

/// Post a review as the logged-in user.
#[instrument(skip(state, user, review), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    JsonBody(review): JsonBody<NewReview>,
) -> Result<Success<ReviewBody>> {
    let review = review.validate()?;
    ensure_listed(&state, id).await?;

    let review = ReviewRepository::new(state.pool())
        .create(id, user.id, &review)
        .await?;

    add_breadcrumb(
        "review",
        "Review posted",
        &[("product_id", id.to_string().as_str())],
    );
    info!(review_id = %review.id, rating = review.rating, "Review posted");

    Ok(Success(ReviewBody {
        message: "Review added",
        review,
    }))
}
