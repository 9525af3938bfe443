//! Cart service.
//!
//! A guest's cart lives only in their session. Once they log in, the cart on
//! their account row is authoritative and the session copy mirrors it: every
//! account mutation runs load, mutate, store inside one row-locked
//! transaction and then refreshes the mirror. The mirror also records the
//! account cart it was copied from, so login only merges what the guest
//! added on top of it.

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::Session;
use tracing::{debug, instrument};

use happy_store_core::session::{self as reconcile, CartOwner, Mirror};
use happy_store_core::{Cart, CartError, CartLine, CartTotals, Catalog, Money, ProductId, Size, UserId};

use crate::db::{CartRepository, RepositoryError, carts};
use crate::models::session_keys;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartServiceError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl From<sqlx::Error> for CartServiceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// A cart priced against the current catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    /// Raw `product -> size -> quantity` map.
    pub cart: Cart,
    pub lines: Vec<CartLine>,
    pub count: u64,
    pub totals: CartTotals,
}

impl CartView {
    #[must_use]
    pub fn build(cart: Cart, catalog: &Catalog, delivery_fee: Money) -> Self {
        Self {
            lines: cart.lines(catalog),
            count: cart.count(),
            totals: cart.totals(catalog, delivery_fee),
            cart,
        }
    }
}

/// Cart operations for one request.
pub struct CartService<'a> {
    pool: &'a PgPool,
    session: &'a Session,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, session: &'a Session) -> Self {
        Self { pool, session }
    }

    /// The mirror held in the session.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Session` if the session cannot be read.
    pub async fn mirror(&self) -> Result<Mirror, CartServiceError> {
        let mirror: Option<Mirror> = self.session.get(session_keys::GUEST_CART).await?;
        Ok(mirror.unwrap_or_default().normalized())
    }

    /// Replace the mirror held in the session.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Session` if the session cannot be written.
    pub async fn set_mirror(&self, mirror: &Mirror) -> Result<(), CartServiceError> {
        self.session.insert(session_keys::GUEST_CART, mirror).await?;
        Ok(())
    }

    /// Edit the guest's cart in the session, keeping its baseline.
    async fn mutate_guest<F>(&self, mutate: F) -> Result<Cart, CartServiceError>
    where
        F: FnOnce(&mut Cart) -> Result<(), CartError>,
    {
        let mut mirror = self.mirror().await?;
        mutate(&mut mirror.cart)?;
        self.set_mirror(&mirror).await?;
        Ok(mirror.cart)
    }

    /// The cart the visitor currently sees.
    ///
    /// # Errors
    ///
    /// Returns a `CartServiceError` if the session or database read fails.
    #[instrument(skip(self))]
    pub async fn current(&self, owner: CartOwner) -> Result<Cart, CartServiceError> {
        match owner {
            CartOwner::Guest => Ok(self.mirror().await?.cart),
            CartOwner::User(user) => {
                let cart = CartRepository::new(self.pool).get(user).await?;
                self.set_mirror(&Mirror::of_account(cart.clone())).await?;
                Ok(cart)
            }
        }
    }

    /// Add one unit of `product` in `size`.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Cart` if no size was chosen, the product is
    /// unknown, or it is not sold in that size.
    #[instrument(skip(self, catalog))]
    pub async fn add(
        &self,
        owner: CartOwner,
        catalog: &Catalog,
        product: ProductId,
        size: Option<Size>,
    ) -> Result<Cart, CartServiceError> {
        match owner {
            CartOwner::Guest => {
                self.mutate_guest(|cart| cart.add_from_catalog(catalog, product, size).map(drop))
                    .await
            }
            CartOwner::User(user) => {
                self.mutate_account(user, |cart| {
                    cart.add_from_catalog(catalog, product, size).map(drop)
                })
                .await
            }
        }
    }

    /// Set the quantity of `(product, size)`. Zero or less removes the entry.
    ///
    /// Raising a quantity checks the product is still sold in that size;
    /// removing never does, so stale entries can always be cleared.
    ///
    /// # Errors
    ///
    /// Returns `CartServiceError::Cart` if a positive quantity targets an
    /// unknown product or size.
    #[instrument(skip(self, catalog))]
    pub async fn update(
        &self,
        owner: CartOwner,
        catalog: &Catalog,
        product: ProductId,
        size: Size,
        quantity: i64,
    ) -> Result<Cart, CartServiceError> {
        if quantity > 0 {
            let listed = catalog
                .find(product)
                .ok_or(CartError::UnknownProduct(product))?;
            if !listed.offers(size) {
                return Err(CartError::SizeUnavailable { product, size }.into());
            }
        }

        match owner {
            CartOwner::Guest => {
                self.mutate_guest(|cart| {
                    cart.set_quantity(product, size, quantity);
                    Ok(())
                })
                .await
            }
            CartOwner::User(user) => {
                self.mutate_account(user, |cart| {
                    cart.set_quantity(product, size, quantity);
                    Ok(())
                })
                .await
            }
        }
    }

    /// Merge the guest's additions into the account cart after login.
    ///
    /// # Errors
    ///
    /// Returns a `CartServiceError` if the session or database access fails.
    #[instrument(skip(self))]
    pub async fn login(&self, user: UserId) -> Result<Cart, CartServiceError> {
        let guest = self.mirror().await?;

        let mut tx = self.pool.begin().await?;
        let server = carts::lock(&mut tx, user).await?;
        let reconciled = reconcile::reconcile_login(&guest, server);
        if reconciled.changed {
            carts::store(&mut tx, user, &reconciled.server).await?;
        }
        tx.commit().await?;

        debug!(
            merged = reconciled.changed,
            items = reconciled.server.count(),
            "Cart reconciled on login"
        );
        self.set_mirror(&reconciled.mirror).await?;
        Ok(reconciled.server)
    }

    /// Leave a snapshot of the account cart in the session on logout.
    ///
    /// # Errors
    ///
    /// Returns a `CartServiceError` if the session or database access fails.
    #[instrument(skip(self))]
    pub async fn logout(&self, user: UserId) -> Result<Cart, CartServiceError> {
        let server = CartRepository::new(self.pool).get(user).await?;
        let snapshot = reconcile::logout(&server);
        self.set_mirror(&snapshot).await?;
        Ok(snapshot.cart)
    }

    async fn mutate_account<F>(&self, user: UserId, mutate: F) -> Result<Cart, CartServiceError>
    where
        F: FnOnce(&mut Cart) -> Result<(), CartError>,
    {
        let mut tx = self.pool.begin().await?;
        let mut cart = carts::lock(&mut tx, user).await?;
        mutate(&mut cart)?;
        carts::store(&mut tx, user, &cart).await?;
        tx.commit().await?;

        self.set_mirror(&Mirror::of_account(cart.clone())).await?;
        Ok(cart)
    }
}
