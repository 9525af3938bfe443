//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration and password login
//! - `cart` - Guest and account carts, and reconciliation between them
//! - `checkout` - Turning the account cart into an order

pub mod auth;
pub mod cart;
pub mod checkout;

pub use auth::{AuthError, AuthService};
pub use cart::{CartService, CartServiceError, CartView};
pub use checkout::{CheckoutService, CheckoutServiceError};
