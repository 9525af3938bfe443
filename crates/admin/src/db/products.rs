//! Catalog writes.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use happy_store_core::{Category, Money, Product, ProductId, Size, SubCategory};

use super::RepositoryError;
use crate::models::NewProduct;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, images, category, sub_category, sizes, bestseller, created_at";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: String,
    price: Money,
    images: Vec<String>,
    category: String,
    sub_category: String,
    sizes: Vec<String>,
    bestseller: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let corrupt = |e: happy_store_core::ParseError| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        };

        Ok(Self {
            category: row.category.parse::<Category>().map_err(corrupt)?,
            sub_category: row.sub_category.parse::<SubCategory>().map_err(corrupt)?,
            sizes: row
                .sizes
                .iter()
                .map(|s| s.parse::<Size>())
                .collect::<Result<_, _>>()
                .map_err(corrupt)?,
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            images: row.images,
            bestseller: row.bestseller,
            created_at: row.created_at,
        })
    }
}

/// Repository for catalog management.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Insert a validated product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        insert(&mut conn, product).await
    }

    /// Delete a product. Its reviews and favourites go with it; carts that
    /// still reference it simply stop pricing that line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Insert a validated product on `conn`, e.g. inside a caller's transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
#[instrument(skip(conn, product), fields(name = %product.name))]
pub async fn insert(
    conn: &mut PgConnection,
    product: &NewProduct,
) -> Result<Product, RepositoryError> {
    let sizes: Vec<&str> = product.sizes.iter().map(|s| s.label()).collect();

    let row: ProductRow = sqlx::query_as(&format!(
        r"
        INSERT INTO shop.product
            (name, description, price, images, category, sub_category, sizes, bestseller)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {PRODUCT_COLUMNS}
        "
    ))
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(&product.images)
    .bind(product.category.label())
    .bind(product.sub_category.label())
    .bind(&sizes)
    .bind(product.bestseller)
    .fetch_one(conn)
    .await?;

    Product::try_from(row)
}
