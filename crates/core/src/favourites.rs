//! Per-user favourite products.

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Favourite product IDs in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favourites(Vec<ProductId>);

impl Favourites {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `product` if absent, remove it if present.
    ///
    /// Returns `true` when the product is a favourite afterwards.
    pub fn toggle(&mut self, product: ProductId) -> bool {
        if let Some(pos) = self.0.iter().position(|id| *id == product) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(product);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, product: ProductId) -> bool {
        self.0.contains(&product)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ProductId> for Favourites {
    /// Collect IDs, keeping the first occurrence of duplicates.
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        let mut favourites = Self::new();
        for id in iter {
            if !favourites.contains(id) {
                favourites.0.push(id);
            }
        }
        favourites
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favs = Favourites::new();
        assert!(favs.toggle(ProductId::new(3)));
        assert!(favs.contains(ProductId::new(3)));
        assert!(!favs.toggle(ProductId::new(3)));
        assert!(favs.is_empty());
    }

    #[test]
    fn test_keeps_insertion_order() {
        let mut favs = Favourites::new();
        favs.toggle(ProductId::new(5));
        favs.toggle(ProductId::new(1));
        favs.toggle(ProductId::new(9));
        favs.toggle(ProductId::new(1));
        let ids: Vec<i32> = favs.iter().map(|id| id.as_i32()).collect();
        assert_eq!(ids, vec![5, 9]);
    }

    #[test]
    fn test_collect_dedupes() {
        let favs: Favourites = [2, 4, 2].into_iter().map(ProductId::new).collect();
        assert_eq!(favs.len(), 2);
    }
}
