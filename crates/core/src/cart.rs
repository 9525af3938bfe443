//! The shopping cart.
//!
//! A cart is a nested map `product -> size -> quantity`. It serializes to the
//! same JSON shape clients already hold in local storage:
//!
//! ```json
//! { "12": { "M": 2, "L": 1 }, "31": { "S": 1 } }
//! ```
//!
//! Every mutation keeps two invariants: no stored quantity is zero, and no
//! product maps to an empty size set. Prices are never stored in the cart;
//! lines and totals are always computed against the current [`Catalog`], so a
//! product removed from the catalog simply stops contributing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::types::{Money, ProductId, Size};

/// Errors from cart mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("Select Product Size")]
    SizeRequired,
    #[error("product not found")]
    UnknownProduct(ProductId),
    #[error("size {size} is not available for this product")]
    SizeUnavailable { product: ProductId, size: Size },
}

/// Quantities per product and size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeMap<ProductId, BTreeMap<Size, u32>>,
}

/// A priced cart line for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub size: Size,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Subtotal, delivery fee and grand total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub total: Money,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product` in `size`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::SizeRequired`] when no size was chosen.
    pub fn add_item(&mut self, product: ProductId, size: Option<Size>) -> Result<u32, CartError> {
        let size = size.ok_or(CartError::SizeRequired)?;
        let quantity = self
            .items
            .entry(product)
            .or_default()
            .entry(size)
            .or_insert(0);
        *quantity = quantity.saturating_add(1);
        Ok(*quantity)
    }

    /// Add one unit after checking the product exists and offers `size`.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the size is missing, the product is unknown,
    /// or the product is not sold in that size.
    pub fn add_from_catalog(
        &mut self,
        catalog: &Catalog,
        product: ProductId,
        size: Option<Size>,
    ) -> Result<u32, CartError> {
        let size = size.ok_or(CartError::SizeRequired)?;
        let listed = catalog
            .find(product)
            .ok_or(CartError::UnknownProduct(product))?;
        if !listed.offers(size) {
            return Err(CartError::SizeUnavailable { product, size });
        }
        self.add_item(product, Some(size))
    }

    /// Set the quantity for `(product, size)`. Zero or negative removes it.
    pub fn set_quantity(&mut self, product: ProductId, size: Size, quantity: i64) {
        if quantity <= 0 {
            if let Some(sizes) = self.items.get_mut(&product) {
                sizes.remove(&size);
                if sizes.is_empty() {
                    self.items.remove(&product);
                }
            }
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.items.entry(product).or_default().insert(size, quantity);
    }

    /// Quantity held for `(product, size)`, zero if absent.
    #[must_use]
    pub fn quantity(&self, product: ProductId, size: Size) -> u32 {
        self.items
            .get(&product)
            .and_then(|sizes| sizes.get(&size))
            .copied()
            .unwrap_or(0)
    }

    /// Total number of units across all products and sizes.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.entries().map(|(_, _, qty)| u64::from(qty)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate `(product, size, quantity)` for every positive entry.
    pub fn entries(&self) -> impl Iterator<Item = (ProductId, Size, u32)> + '_ {
        self.items.iter().flat_map(|(product, sizes)| {
            sizes
                .iter()
                .filter(|(_, qty)| **qty > 0)
                .map(move |(size, qty)| (*product, *size, *qty))
        })
    }

    /// Priced lines for products still present in `catalog`.
    #[must_use]
    pub fn lines(&self, catalog: &Catalog) -> Vec<CartLine> {
        self.entries()
            .filter_map(|(id, size, quantity)| {
                catalog
                    .find(id)
                    .map(|product| CartLine::new(product, size, quantity))
            })
            .collect()
    }

    /// Sum of line totals. Products missing from `catalog` are ignored.
    #[must_use]
    pub fn subtotal(&self, catalog: &Catalog) -> Money {
        self.entries()
            .filter_map(|(id, _, quantity)| catalog.find(id).map(|p| p.price * quantity))
            .sum()
    }

    /// Totals as shown on the cart page. An empty subtotal owes no delivery fee.
    #[must_use]
    pub fn totals(&self, catalog: &Catalog, delivery_fee: Money) -> CartTotals {
        let subtotal = self.subtotal(catalog);
        if subtotal.is_zero() {
            return CartTotals {
                subtotal,
                delivery_fee,
                total: Money::ZERO,
            };
        }
        CartTotals {
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }

    /// Fold `other` into `self`, summing quantities of shared entries.
    pub fn merge(&mut self, other: &Self) {
        for (product, size, quantity) in other.entries() {
            let slot = self
                .items
                .entry(product)
                .or_default()
                .entry(size)
                .or_insert(0);
            *slot = slot.saturating_add(quantity);
        }
    }

    /// Units in `self` beyond what `baseline` holds, per product and size.
    ///
    /// Entries at or below the baseline quantity contribute nothing.
    #[must_use]
    pub fn additions_over(&self, baseline: &Self) -> Self {
        let mut added = Self::new();
        for (product, size, quantity) in self.entries() {
            let extra = quantity.saturating_sub(baseline.quantity(product, size));
            if extra > 0 {
                added.set_quantity(product, size, i64::from(extra));
            }
        }
        added
    }

    /// Drop zero quantities and empty products, e.g. after deserializing
    /// a cart a client edited by hand.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.items.retain(|_, sizes| {
            sizes.retain(|_, qty| *qty > 0);
            !sizes.is_empty()
        });
        self
    }
}

impl CartLine {
    fn new(product: &Product, size: Size, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            image: product.thumbnail().map(str::to_owned),
            size,
            quantity,
            unit_price: product.price,
            line_total: product.price * quantity,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::catalog;

    const HOODIE: ProductId = ProductId::new(1);
    const TEE: ProductId = ProductId::new(2);
    const GONE: ProductId = ProductId::new(99);

    #[test]
    fn test_add_item_increments() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_item(HOODIE, Some(Size::M)).unwrap(), 1);
        assert_eq!(cart.add_item(HOODIE, Some(Size::M)).unwrap(), 2);
        assert_eq!(cart.add_item(HOODIE, Some(Size::L)).unwrap(), 1);
        assert_eq!(cart.quantity(HOODIE, Size::M), 2);
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_add_item_requires_size() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_item(HOODIE, None), Err(CartError::SizeRequired));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_from_catalog_checks_product_and_size() {
        let catalog = catalog();
        let mut cart = Cart::new();

        assert_eq!(
            cart.add_from_catalog(&catalog, GONE, Some(Size::M)),
            Err(CartError::UnknownProduct(GONE))
        );
        assert_eq!(
            cart.add_from_catalog(&catalog, TEE, Some(Size::XXL)),
            Err(CartError::SizeUnavailable {
                product: TEE,
                size: Size::XXL
            })
        );
        assert_eq!(cart.add_from_catalog(&catalog, TEE, Some(Size::S)).unwrap(), 1);
    }

    #[test]
    fn test_set_quantity_zero_removes_and_prunes_product() {
        let mut cart = Cart::new();
        cart.add_item(HOODIE, Some(Size::M)).unwrap();
        cart.add_item(TEE, Some(Size::S)).unwrap();

        cart.set_quantity(HOODIE, Size::M, 0);
        assert_eq!(cart.quantity(HOODIE, Size::M), 0);
        assert_eq!(serde_json::to_string(&cart).unwrap(), r#"{"2":{"S":1}}"#);

        cart.set_quantity(TEE, Size::S, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_on_missing_entry() {
        let mut cart = Cart::new();
        cart.set_quantity(HOODIE, Size::L, 0);
        assert!(cart.is_empty());

        cart.set_quantity(HOODIE, Size::L, 4);
        assert_eq!(cart.quantity(HOODIE, Size::L), 4);
    }

    #[test]
    fn test_subtotal_ignores_unknown_products() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.set_quantity(HOODIE, Size::M, 2);
        cart.set_quantity(TEE, Size::S, 1);
        cart.set_quantity(GONE, Size::S, 5);

        assert_eq!(cart.subtotal(&catalog), Money::from_major(2 * 1200 + 400));
        assert_eq!(cart.lines(&catalog).len(), 2);
        assert_eq!(cart.count(), 8);
    }

    #[test]
    fn test_totals_add_delivery_fee_only_when_non_empty() {
        let catalog = catalog();
        let fee = Money::from_major(10);

        let empty = Cart::new().totals(&catalog, fee);
        assert_eq!(empty.total, Money::ZERO);
        assert_eq!(empty.delivery_fee, fee);

        let mut cart = Cart::new();
        cart.set_quantity(TEE, Size::M, 3);
        let totals = cart.totals(&catalog, fee);
        assert_eq!(totals.subtotal, Money::from_major(1200));
        assert_eq!(totals.total, Money::from_major(1210));
    }

    #[test]
    fn test_lines_carry_price_and_thumbnail() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.set_quantity(TEE, Size::L, 2);

        let lines = cart.lines(&catalog);
        let line = lines.first().unwrap();
        assert_eq!(line.name, "Graphic Tee");
        assert_eq!(line.unit_price, Money::from_major(400));
        assert_eq!(line.line_total, Money::from_major(800));
        assert_eq!(line.image.as_deref(), Some("https://img.example.com/2.jpg"));
    }

    #[test]
    fn test_merge_sums_shared_entries() {
        let mut server = Cart::new();
        server.set_quantity(HOODIE, Size::M, 1);
        server.set_quantity(TEE, Size::S, 2);

        let mut guest = Cart::new();
        guest.set_quantity(HOODIE, Size::M, 2);
        guest.set_quantity(HOODIE, Size::XL, 1);

        server.merge(&guest);
        assert_eq!(server.quantity(HOODIE, Size::M), 3);
        assert_eq!(server.quantity(HOODIE, Size::XL), 1);
        assert_eq!(server.quantity(TEE, Size::S), 2);
        assert_eq!(server.count(), 6);
    }

    #[test]
    fn test_additions_over_baseline() {
        let mut baseline = Cart::new();
        baseline.set_quantity(HOODIE, Size::M, 2);
        baseline.set_quantity(TEE, Size::S, 3);

        let mut current = baseline.clone();
        current.set_quantity(HOODIE, Size::M, 5);
        current.set_quantity(TEE, Size::S, 1);
        current.set_quantity(TEE, Size::L, 1);

        let added = current.additions_over(&baseline);
        assert_eq!(added.quantity(HOODIE, Size::M), 3);
        assert_eq!(added.quantity(TEE, Size::S), 0);
        assert_eq!(added.quantity(TEE, Size::L), 1);
        assert_eq!(added.count(), 4);
        assert!(baseline.additions_over(&baseline).is_empty());
    }

    #[test]
    fn test_deserialize_and_normalize() {
        let raw = r#"{"1":{"M":0,"L":2},"2":{"S":0}}"#;
        let cart: Cart = serde_json::from_str(raw).unwrap();
        let cart = cart.normalized();
        assert_eq!(serde_json::to_string(&cart).unwrap(), r#"{"1":{"L":2}}"#);
    }
}
