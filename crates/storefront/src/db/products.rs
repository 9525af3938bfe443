//! Product reads. The catalog is written by the admin binary.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use happy_store_core::{Category, Money, Product, ProductId, Size, SubCategory};

use super::RepositoryError;

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

        let category = row.category.parse::<Category>().map_err(corrupt)?;
        let sub_category = row.sub_category.parse::<SubCategory>().map_err(corrupt)?;
        let sizes = row
            .sizes
            .iter()
            .map(|s| s.parse::<Size>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            images: row.images,
            category,
            sub_category,
            sizes,
            bestseller: row.bestseller,
            created_at: row.created_at,
        })
    }
}

/// Repository for product reads.
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
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored label is unknown.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, description, price, images, category, sub_category,
                   sizes, bestseller, created_at
            FROM shop.product
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }
}
