//! Admin-side models.

pub mod product;
pub mod session;

pub use product::{NewProduct, ProductForm, ProductFormError};
pub use session::{CurrentAdmin, keys as session_keys};
