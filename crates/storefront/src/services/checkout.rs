//! Checkout service.
//!
//! Orders are rebuilt from the account cart and the current catalog; nothing
//! the client sends about items or amounts is trusted. Placing an order and
//! emptying the cart happen in the same transaction.

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::Session;
use tracing::{info, instrument};

use happy_store_core::session as reconcile;
use happy_store_core::{Catalog, CheckoutError, DeliveryAddress, Money, Order, OrderDraft, PaymentMethod, UserId};

use crate::db::{RepositoryError, carts, orders};
use crate::models::session_keys;

/// Errors from placing an order.
#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl From<sqlx::Error> for CheckoutServiceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// Places orders for a logged-in user.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    session: &'a Session,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, session: &'a Session) -> Self {
        Self { pool, session }
    }

    /// Turn the user's cart into an order, then empty the cart and its mirror.
    ///
    /// Both cash-on-delivery and card orders are recorded unpaid with status
    /// `Order Placed`; no payment gateway is contacted.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutServiceError::Checkout` if the address is invalid or
    /// the cart has nothing orderable, and `Repository`/`Session` errors if
    /// persistence fails. On error the cart is left untouched.
    #[instrument(skip(self, catalog, address), fields(user_id = %user, method = %payment_method))]
    pub async fn place_order(
        &self,
        user: UserId,
        catalog: &Catalog,
        delivery_fee: Money,
        address: DeliveryAddress,
        payment_method: PaymentMethod,
    ) -> Result<Order, CheckoutServiceError> {
        let mut tx = self.pool.begin().await?;
        let cart = carts::lock(&mut tx, user).await?;

        let draft = OrderDraft::from_cart(&cart, catalog, delivery_fee, address, payment_method)?;
        let order = orders::insert(&mut tx, user, &draft).await?;

        let (server, mirror) = reconcile::after_order();
        carts::store(&mut tx, user, &server).await?;
        tx.commit().await?;

        self.session.insert(session_keys::GUEST_CART, &mirror).await?;

        info!(
            order_id = %order.id,
            items = order.items.len(),
            amount = %order.amount,
            "Order placed"
        );
        Ok(order)
    }
}
