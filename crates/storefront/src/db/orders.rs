//! Order persistence.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use happy_store_core::{
    DeliveryAddress, Money, Order, OrderDraft, OrderId, OrderItem, OrderStatus, PaymentMethod,
    UserId,
};

use super::RepositoryError;

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
        let status = row.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.id))
        })?;
        let payment_method = row.payment_method.parse::<PaymentMethod>().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            items: row.items.0,
            amount: row.amount,
            address: row.address.0,
            status,
            payment_method,
            payment: row.payment,
            placed_at: row.placed_at,
        })
    }
}

const ORDER_COLUMNS: &str =
    "id, user_id, items, amount, address, status, payment_method, payment, placed_at";

/// Repository for a customer's orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All orders placed by `user`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn list_for_user(&self, user: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.order WHERE user_id = $1 ORDER BY placed_at DESC, id DESC"
        ))
        .bind(user)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }
}

/// Insert a new order inside the caller's transaction.
///
/// The order starts as `Order Placed` and unpaid.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
#[instrument(skip(conn, draft), fields(user_id = %user, items = draft.items.len()))]
pub async fn insert(
    conn: &mut PgConnection,
    user: UserId,
    draft: &OrderDraft,
) -> Result<Order, RepositoryError> {
    let row: OrderRow = sqlx::query_as(&format!(
        r"
        INSERT INTO shop.order (user_id, items, amount, address, status, payment_method, payment)
        VALUES ($1, $2, $3, $4, $5, $6, FALSE)
        RETURNING {ORDER_COLUMNS}
        "
    ))
    .bind(user)
    .bind(Json(&draft.items))
    .bind(draft.amount)
    .bind(Json(&draft.address))
    .bind(OrderStatus::default().label())
    .bind(draft.payment_method.as_str())
    .fetch_one(conn)
    .await?;

    Order::try_from(row)
}
