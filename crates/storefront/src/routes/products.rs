//! Product route handlers.
//!
//! Everything here reads from the cached catalog; nothing touches the
//! database unless the cache has expired.

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use happy_store_core::catalog::{LATEST_LIMIT, RAIL_LIMIT};
use happy_store_core::{
    Category, ParseError, Product, ProductId, ProductQuery, SortOrder, parse_list,
};

use super::{Success, limit_or};
use crate::error::{AppError, Result};
use crate::state::AppState;

#[allow(clippy::needless_pass_by_value)]
fn bad_request(err: ParseError) -> AppError {
    AppError::BadRequest(err.to_string())
}

/// Collection page filters. List fields are comma-separated labels.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub sort: Option<String>,
}

impl TryFrom<ListParams> for ProductQuery {
    type Error = AppError;

    fn try_from(params: ListParams) -> Result<Self> {
        Ok(Self {
            search: params.search,
            categories: parse_list(params.category.as_deref().unwrap_or_default())
                .map_err(bad_request)?,
            sub_categories: parse_list(params.sub_category.as_deref().unwrap_or_default())
                .map_err(bad_request)?,
            sort: params
                .sort
                .as_deref()
                .map(str::parse::<SortOrder>)
                .transpose()
                .map_err(bad_request)?
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub category: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
}

impl<'a> FromIterator<&'a Product> for ProductList {
    fn from_iter<I: IntoIterator<Item = &'a Product>>(iter: I) -> Self {
        Self {
            products: iter.into_iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: Product,
}

fn not_found() -> AppError {
    AppError::NotFound("Product not found".to_owned())
}

/// Filtered and sorted collection.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Success<ProductList>> {
    let query = ProductQuery::try_from(params)?;
    let catalog = state.catalog().await?;
    Ok(Success(catalog.query(&query).into_iter().collect()))
}

/// Newest products.
#[instrument(skip(state))]
pub async fn latest(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Success<ProductList>> {
    let catalog = state.catalog().await?;
    let limit = limit_or(params.limit, LATEST_LIMIT);
    Ok(Success(catalog.latest(limit).into_iter().collect()))
}

/// Newest bestsellers.
#[instrument(skip(state))]
pub async fn bestsellers(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Success<ProductList>> {
    let catalog = state.catalog().await?;
    let limit = limit_or(params.limit, RAIL_LIMIT);
    Ok(Success(catalog.bestsellers(limit).into_iter().collect()))
}

/// Most expensive products in one category.
#[instrument(skip(state))]
pub async fn top(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> Result<Success<ProductList>> {
    let category: Category = params
        .category
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("category is required".to_owned()))?
        .parse()
        .map_err(bad_request)?;

    let catalog = state.catalog().await?;
    let limit = limit_or(params.limit, RAIL_LIMIT);
    Ok(Success(
        catalog.top_in_category(category, limit).into_iter().collect(),
    ))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Success<ProductDetail>> {
    let catalog = state.catalog().await?;
    let product = catalog.find(id).cloned().ok_or_else(not_found)?;
    Ok(Success(ProductDetail { product }))
}

/// Products in the same category and sub-category.
#[instrument(skip(state))]
pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Query(params): Query<LimitParams>,
) -> Result<Success<ProductList>> {
    let catalog = state.catalog().await?;
    let product = catalog.find(id).ok_or_else(not_found)?;
    let limit = limit_or(params.limit, RAIL_LIMIT);
    Ok(Success(catalog.related(product, limit).into_iter().collect()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(category: &str, sub_category: &str, sort: &str) -> ListParams {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_owned());
        ListParams {
            search: None,
            category: opt(category),
            sub_category: opt(sub_category),
            sort: opt(sort),
        }
    }

    #[test]
    fn test_list_params_parse_comma_separated_filters() {
        let query = ProductQuery::try_from(params("Men,Women", "Topwear", "low-high")).unwrap();
        assert_eq!(query.categories, vec![Category::Men, Category::Women]);
        assert_eq!(query.sub_categories.len(), 1);
        assert_eq!(query.sort, SortOrder::PriceLowHigh);
    }

    #[test]
    fn test_list_params_default_to_unfiltered() {
        let query = ProductQuery::try_from(ListParams::default()).unwrap();
        assert_eq!(query, ProductQuery::default());
    }

    #[test]
    fn test_list_params_reject_unknown_labels() {
        let err = ProductQuery::try_from(params("Pets", "", "")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("Pets")));

        let err = ProductQuery::try_from(params("", "", "cheapest")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
