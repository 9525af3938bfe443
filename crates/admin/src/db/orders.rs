//! Order management.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

use happy_store_core::{
    DeliveryAddress, Money, Order, OrderId, OrderItem, OrderStatus, PaymentMethod, UserId,
};

use super::RepositoryError;

const ORDER_COLUMNS: &str =
    "id, user_id, items, amount, address, status, payment_method, payment, placed_at";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    items: Json<Vec<OrderItem>>,
    amount: Money,
    address: Json<DeliveryAddress>,
    status: String,
    payment_method: String,
    payment: bool,
    placed_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let corrupt = |e: happy_store_core::ParseError| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.id))
        };

        Ok(Self {
            status: row.status.parse::<OrderStatus>().map_err(corrupt)?,
            payment_method: row.payment_method.parse::<PaymentMethod>().map_err(corrupt)?,
            id: row.id,
            user_id: row.user_id,
            items: row.items.0,
            amount: row.amount,
            address: row.address.0,
            payment: row.payment,
            placed_at: row.placed_at,
        })
    }
}

/// Repository for orders across all customers.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.order ORDER BY placed_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this id.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE shop.order SET status = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status.label())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound).and_then(Order::try_from)
    }
}
