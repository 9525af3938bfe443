//! Happy Store Core - Shared domain logic.
//!
//! This crate provides the domain model used across all Happy Store components:
//! - `storefront` - Customer-facing JSON API
//! - `admin` - Admin console API (catalog and order management)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains types and pure logic only - no I/O, no database
//! access, no HTTP. Cart reconciliation, totals, checkout validation and review
//! aggregation all live here so they can be tested without a running server.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, money, sizes, categories and statuses
//! - [`catalog`] - Products and catalog queries (filter, sort, related, bestsellers)
//! - [`cart`] - The per-visitor cart and its totals
//! - [`session`] - Guest/user cart reconciliation on login, logout and checkout
//! - [`checkout`] - Delivery address validation and order drafts
//! - [`order`] - Placed orders and order history
//! - [`review`] - Product reviews and rating summaries
//! - [`favourites`] - Per-user favourite products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod favourites;
pub mod order;
pub mod review;
pub mod session;
pub mod types;

pub use cart::{Cart, CartError, CartLine, CartTotals};
pub use catalog::{Catalog, Product, ProductQuery, SortOrder};
pub use checkout::{AddressError, CheckoutError, DeliveryAddress, OrderDraft};
pub use favourites::Favourites;
pub use order::{Order, OrderHistoryRow, OrderItem};
pub use review::{NewReview, Review, ReviewAuthor, ReviewError, ReviewSummary};
pub use session::{CartOwner, Mirror, Reconciled};
pub use types::*;
