//! Application state shared across handlers.

use std::sync::Arc;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use happy_store_core::{Catalog, Money};

use crate::config::StorefrontConfig;
use crate::db::{ProductRepository, RepositoryError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    /// Whole product list under a single key, refreshed after the TTL.
    catalog: Cache<(), Arc<Catalog>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let catalog = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.catalog_ttl)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn delivery_fee(&self) -> Money {
        self.inner.config.delivery_fee
    }

    /// The current product catalog, loaded from the database on a cache miss.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the products cannot be loaded.
    pub async fn catalog(&self) -> Result<Arc<Catalog>, RepositoryError> {
        if let Some(catalog) = self.inner.catalog.get(&()).await {
            debug!("Cache hit for catalog");
            return Ok(catalog);
        }

        let products = ProductRepository::new(&self.inner.pool).list_all().await?;
        let catalog = Arc::new(Catalog::new(products));
        debug!(products = catalog.len(), "Catalog loaded");

        self.inner.catalog.insert((), Arc::clone(&catalog)).await;
        Ok(catalog)
    }

    /// Seed the catalog cache directly.
    #[cfg(test)]
    pub(crate) async fn prime_catalog(&self, catalog: Catalog) {
        self.inner.catalog.insert((), Arc::new(catalog)).await;
    }
}
