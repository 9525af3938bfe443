//! Favourite products per user.

use sqlx::PgPool;
use tracing::instrument;

use happy_store_core::{Favourites, ProductId, UserId};

use super::RepositoryError;

/// Repository for favourites.
pub struct FavouriteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FavouriteRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A user's favourites in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn list(&self, user: UserId) -> Result<Favourites, RepositoryError> {
        let ids: Vec<ProductId> = sqlx::query_scalar(
            "SELECT product_id FROM shop.favourite WHERE user_id = $1 ORDER BY created_at, product_id",
        )
        .bind(user)
        .fetch_all(self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }

    /// Add `product` to the user's favourites, or remove it if already there.
    ///
    /// Toggles for one user are serialized on their account row, so the
    /// returned flag and list always reflect this toggle alone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user or product does not exist.
    #[instrument(skip(self), fields(user_id = %user, product_id = %product))]
    pub async fn toggle(
        &self,
        user: UserId,
        product: ProductId,
    ) -> Result<(bool, Favourites), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>("SELECT id FROM shop.user WHERE id = $1 FOR UPDATE")
            .bind(user)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let removed: Option<ProductId> = sqlx::query_scalar(
            "DELETE FROM shop.favourite WHERE user_id = $1 AND product_id = $2 RETURNING product_id",
        )
        .bind(user)
        .bind(product)
        .fetch_optional(&mut *tx)
        .await?;

        if removed.is_none() {
            sqlx::query(
                r"
                INSERT INTO shop.favourite (user_id, product_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                ",
            )
            .bind(user)
            .bind(product)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_constraint(e, "favourite exists"))?;
        }

        let ids: Vec<ProductId> = sqlx::query_scalar(
            "SELECT product_id FROM shop.favourite WHERE user_id = $1 ORDER BY created_at, product_id",
        )
        .bind(user)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok((removed.is_none(), ids.into_iter().collect()))
    }
}
