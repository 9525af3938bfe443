//! Product reviews.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use happy_store_core::{NewReview, ProductId, Review, ReviewAuthor, ReviewId, UserId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: ReviewId,
    product_id: ProductId,
    user_id: UserId,
    user_name: String,
    rating: i16,
    comment: String,
    images: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let rating = u8::try_from(row.rating).map_err(|_| {
            RepositoryError::DataCorruption(format!("review {}: rating {}", row.id, row.rating))
        })?;
        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            author: ReviewAuthor {
                id: row.user_id,
                name: row.user_name,
            },
            rating,
            comment: row.comment,
            images: row.images,
            created_at: row.created_at,
        })
    }
}

/// Repository for product reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Reviews for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(product_id = %product))]
    pub async fn list_for_product(
        &self,
        product: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            r"
            SELECT r.id, r.product_id, r.user_id, u.name AS user_name,
                   r.rating, r.comment, r.images, r.created_at
            FROM shop.review r
            JOIN shop.user u ON u.id = r.user_id
            WHERE r.product_id = $1
            ORDER BY r.created_at DESC, r.id DESC
            ",
        )
        .bind(product)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Review::try_from).collect()
    }

    /// Store a validated review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product or user no longer exists.
    #[instrument(skip(self, review), fields(product_id = %product, user_id = %user))]
    pub async fn create(
        &self,
        product: ProductId,
        user: UserId,
        review: &NewReview,
    ) -> Result<Review, RepositoryError> {
        let row: ReviewRow = sqlx::query_as(
            r"
            WITH inserted AS (
                INSERT INTO shop.review (product_id, user_id, rating, comment, images)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, product_id, user_id, rating, comment, images, created_at
            )
            SELECT i.id, i.product_id, i.user_id, u.name AS user_name,
                   i.rating, i.comment, i.images, i.created_at
            FROM inserted i
            JOIN shop.user u ON u.id = i.user_id
            ",
        )
        .bind(product)
        .bind(user)
        .bind(i16::from(review.rating))
        .bind(&review.comment)
        .bind(&review.images)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_constraint(e, "duplicate review"))?;

        Review::try_from(row)
    }
}
