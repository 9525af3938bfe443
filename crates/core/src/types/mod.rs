//! Core types for Happy Store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod product;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{Currency, Money};
pub use product::{Category, ParseError, Size, SubCategory, parse_list};
pub use status::*;
