//! Products and read-only catalog queries.
//!
//! The storefront keeps a snapshot of the whole product list (it is small) and
//! answers every browse view from it: the collection page filters, the home
//! page rails (latest, bestsellers, most expensive per category) and the
//! related-products strip on a product page.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Category, Money, ParseError, ProductId, Size, SubCategory};

/// Default length of the "latest collection" rail.
pub const LATEST_LIMIT: usize = 10;
/// Default length of the bestseller, related and per-category rails.
pub const RAIL_LIMIT: usize = 5;

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub images: Vec<String>,
    pub category: Category,
    pub sub_category: SubCategory,
    pub sizes: Vec<Size>,
    pub bestseller: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product can be ordered in `size`.
    #[must_use]
    pub fn offers(&self, size: Size) -> bool {
        self.sizes.contains(&size)
    }

    /// First image, used as the thumbnail in carts and orders.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Collection page sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Catalog order (newest first).
    #[default]
    #[serde(rename = "relevant")]
    Relevant,
    #[serde(rename = "low-high")]
    PriceLowHigh,
    #[serde(rename = "high-low")]
    PriceHighLow,
}

impl FromStr for SortOrder {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "relevant" => Ok(Self::Relevant),
            "low-high" => Ok(Self::PriceLowHigh),
            "high-low" => Ok(Self::PriceHighLow),
            other => Err(ParseError::new("sort order", other)),
        }
    }
}

/// Filters for the collection page. Empty fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub categories: Vec<Category>,
    pub sub_categories: Vec<SubCategory>,
    pub sort: SortOrder,
}

impl ProductQuery {
    fn matches(&self, product: &Product, needle: Option<&str>) -> bool {
        if let Some(needle) = needle
            && !product.name.to_lowercase().contains(needle)
        {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }
        if !self.sub_categories.is_empty() && !self.sub_categories.contains(&product.sub_category)
        {
            return false;
        }
        true
    }
}

/// An immutable, newest-first product list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, ordering products newest first.
    ///
    /// Products created at the same instant keep a stable order by descending id.
    #[must_use]
    pub fn new(mut products: Vec<Product>) -> Self {
        products.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Self { products }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Filter and sort for the collection page.
    #[must_use]
    pub fn query(&self, query: &ProductQuery) -> Vec<&Product> {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matches: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| query.matches(p, needle.as_deref()))
            .collect();

        match query.sort {
            SortOrder::Relevant => {}
            SortOrder::PriceLowHigh => matches.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceHighLow => matches.sort_by(|a, b| b.price.cmp(&a.price)),
        }

        matches
    }

    /// The `limit` newest products.
    #[must_use]
    pub fn latest(&self, limit: usize) -> Vec<&Product> {
        self.products.iter().take(limit).collect()
    }

    /// The `limit` newest products flagged as bestsellers.
    #[must_use]
    pub fn bestsellers(&self, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.bestseller)
            .take(limit)
            .collect()
    }

    /// Products in the same category and sub-category, excluding `product` itself.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| {
                p.id != product.id
                    && p.category == product.category
                    && p.sub_category == product.sub_category
            })
            .take(limit)
            .collect()
    }

    /// The `limit` most expensive products in `category`.
    #[must_use]
    pub fn top_in_category(&self, category: Category, limit: usize) -> Vec<&Product> {
        let mut in_category: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.category == category)
            .collect();
        in_category.sort_by(|a, b| b.price.cmp(&a.price));
        in_category.truncate(limit);
        in_category
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::catalog;
    use super::*;

    fn ids(products: &[&Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_catalog_is_newest_first() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.latest(10)), vec![5, 4, 3, 2, 1]);
        assert_eq!(ids(&catalog.latest(2)), vec![5, 4]);
    }

    #[test]
    fn test_query_search_is_case_insensitive_substring() {
        let catalog = catalog();
        let query = ProductQuery {
            search: Some("  TEE ".to_owned()),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&catalog.query(&query)), vec![3, 2]);
    }

    #[test]
    fn test_query_blank_search_does_not_filter() {
        let catalog = catalog();
        let query = ProductQuery {
            search: Some("   ".to_owned()),
            ..ProductQuery::default()
        };
        assert_eq!(catalog.query(&query).len(), 5);
    }

    #[test]
    fn test_query_category_and_sub_category() {
        let catalog = catalog();
        let query = ProductQuery {
            categories: vec![Category::Men, Category::Women],
            sub_categories: vec![SubCategory::Topwear],
            ..ProductQuery::default()
        };
        assert_eq!(ids(&catalog.query(&query)), vec![4, 3, 2]);
    }

    #[test]
    fn test_query_sort_by_price() {
        let catalog = catalog();
        let low_high = ProductQuery {
            sort: SortOrder::PriceLowHigh,
            ..ProductQuery::default()
        };
        assert_eq!(ids(&catalog.query(&low_high)), vec![2, 5, 3, 4, 1]);

        let high_low = ProductQuery {
            sort: SortOrder::PriceHighLow,
            ..ProductQuery::default()
        };
        assert_eq!(ids(&catalog.query(&high_low)), vec![1, 4, 3, 5, 2]);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("".parse::<SortOrder>().unwrap(), SortOrder::Relevant);
        assert_eq!("high-low".parse::<SortOrder>().unwrap(), SortOrder::PriceHighLow);
        assert!("cheapest".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_bestsellers() {
        assert_eq!(ids(&catalog().bestsellers(5)), vec![4, 1]);
    }

    #[test]
    fn test_related_excludes_self() {
        let catalog = catalog();
        let polo = catalog.find(ProductId::new(3)).unwrap();
        assert_eq!(ids(&catalog.related(polo, 5)), vec![2]);
    }

    #[test]
    fn test_top_in_category() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.top_in_category(Category::Men, 2)), vec![1, 3]);
        assert!(catalog.top_in_category(Category::Kids, 0).is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.query(&ProductQuery::default()).is_empty());
        assert!(catalog.bestsellers(5).is_empty());
        assert!(catalog.find(ProductId::new(1)).is_none());
    }
}
