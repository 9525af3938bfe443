//! Server-side carts, stored as JSONB on the user row.
//!
//! Writers lock the row with `SELECT ... FOR UPDATE` so concurrent adds for
//! the same user serialize instead of overwriting each other.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use happy_store_core::{Cart, UserId};

use super::RepositoryError;

/// Repository for account carts.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Read a user's cart without locking.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn get(&self, user: UserId) -> Result<Cart, RepositoryError> {
        let cart: Option<Json<Cart>> =
            sqlx::query_scalar("SELECT cart FROM shop.user WHERE id = $1")
                .bind(user)
                .fetch_optional(self.pool)
                .await?;

        cart.map(|Json(cart)| cart.normalized())
            .ok_or(RepositoryError::NotFound)
    }
}

/// Read and lock a user's cart inside a transaction.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user does not exist.
#[instrument(skip(conn), fields(user_id = %user))]
pub async fn lock(conn: &mut PgConnection, user: UserId) -> Result<Cart, RepositoryError> {
    let cart: Option<Json<Cart>> =
        sqlx::query_scalar("SELECT cart FROM shop.user WHERE id = $1 FOR UPDATE")
            .bind(user)
            .fetch_optional(conn)
            .await?;

    cart.map(|Json(cart)| cart.normalized())
        .ok_or(RepositoryError::NotFound)
}

/// Overwrite a user's cart.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user does not exist.
#[instrument(skip(conn, cart), fields(user_id = %user, items = cart.count()))]
pub async fn store(
    conn: &mut PgConnection,
    user: UserId,
    cart: &Cart,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("UPDATE shop.user SET cart = $2, updated_at = NOW() WHERE id = $1")
        .bind(user)
        .bind(Json(cart))
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
