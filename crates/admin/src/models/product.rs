//! Validation for products added from the admin console.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use happy_store_core::{Category, Money, Size, SubCategory};

/// Most images a product can carry.
pub const MAX_PRODUCT_IMAGES: usize = 4;

/// Decimal places `shop.product.price` keeps.
const PRICE_SCALE: u32 = 2;

/// Largest price a `NUMERIC(12, 2)` column holds.
fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, PRICE_SCALE)
}

/// Reasons a product form is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductFormError {
    #[error("Product name is required")]
    NameRequired,
    #[error("Price must be greater than zero")]
    PriceNotPositive,
    #[error("Price can have at most two decimal places")]
    PriceTooPrecise,
    #[error("Price is too large")]
    PriceTooLarge,
    #[error("Select at least one size")]
    SizesRequired,
    #[error("At most {MAX_PRODUCT_IMAGES} images are allowed")]
    TooManyImages,
    #[error("Image is not an http(s) URL: {0}")]
    InvalidImageUrl(String),
}

/// The add-product request body, as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: Category,
    pub sub_category: SubCategory,
    pub sizes: Vec<Size>,
    #[serde(default)]
    pub bestseller: bool,
}

/// A product that passed validation and is ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub images: Vec<String>,
    pub category: Category,
    pub sub_category: SubCategory,
    /// Deduplicated, in the order first submitted.
    pub sizes: Vec<Size>,
    pub bestseller: bool,
}

impl ProductForm {
    /// Check the form and normalise it into a `NewProduct`.
    ///
    /// # Errors
    ///
    /// Returns the first `ProductFormError` found.
    pub fn validate(self) -> Result<NewProduct, ProductFormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProductFormError::NameRequired);
        }
        if !self.price.is_positive() {
            return Err(ProductFormError::PriceNotPositive);
        }
        let amount = self.price.amount();
        if amount.normalize().scale() > PRICE_SCALE {
            return Err(ProductFormError::PriceTooPrecise);
        }
        if amount > max_price() {
            return Err(ProductFormError::PriceTooLarge);
        }

        let mut sizes = Vec::with_capacity(self.sizes.len());
        for size in self.sizes {
            if !sizes.contains(&size) {
                sizes.push(size);
            }
        }
        if sizes.is_empty() {
            return Err(ProductFormError::SizesRequired);
        }

        if self.images.len() > MAX_PRODUCT_IMAGES {
            return Err(ProductFormError::TooManyImages);
        }
        let images = self
            .images
            .into_iter()
            .map(|raw| {
                let raw = raw.trim().to_owned();
                match Url::parse(&raw) {
                    Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                        Ok(raw)
                    }
                    _ => Err(ProductFormError::InvalidImageUrl(raw)),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewProduct {
            name: name.to_owned(),
            description: self.description.trim().to_owned(),
            price: self.price,
            images,
            category: self.category,
            sub_category: self.sub_category,
            sizes,
            bestseller: self.bestseller,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        serde_json::from_value(serde_json::json!({
            "name": "  Wool Coat ",
            "description": "Warm.",
            "price": "2499.00",
            "images": ["https://img.example.com/coat.jpg"],
            "category": "Women",
            "sub_category": "Winterwear",
            "sizes": ["M", "L", "M"],
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_form_is_normalised() {
        let product = form().validate().unwrap();
        assert_eq!(product.name, "Wool Coat");
        assert_eq!(product.sizes, vec![Size::M, Size::L]);
        assert!(!product.bestseller);
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut f = form();
        f.name = "   ".to_owned();
        assert_eq!(f.validate().unwrap_err(), ProductFormError::NameRequired);
    }

    #[test]
    fn test_price_must_be_positive() {
        let mut f = form();
        f.price = Money::ZERO;
        assert_eq!(f.validate().unwrap_err(), ProductFormError::PriceNotPositive);
    }

    #[test]
    fn test_price_fits_the_column() {
        let mut f = form();
        f.price = serde_json::from_str(r#""0.001""#).unwrap();
        assert_eq!(f.validate().unwrap_err(), ProductFormError::PriceTooPrecise);

        let mut f = form();
        f.price = serde_json::from_str(r#""19.990""#).unwrap();
        assert!(f.validate().is_ok());

        let mut f = form();
        f.price = Money::from_major(10_000_000_000);
        assert_eq!(f.validate().unwrap_err(), ProductFormError::PriceTooLarge);

        let mut f = form();
        f.price = serde_json::from_str(r#""9999999999.99""#).unwrap();
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_sizes_required() {
        let mut f = form();
        f.sizes.clear();
        assert_eq!(f.validate().unwrap_err(), ProductFormError::SizesRequired);
    }

    #[test]
    fn test_image_limits() {
        let mut f = form();
        f.images = vec!["https://img.example.com/a.jpg".to_owned(); 5];
        assert_eq!(f.validate().unwrap_err(), ProductFormError::TooManyImages);

        let mut f = form();
        f.images = vec!["ftp://img.example.com/a.jpg".to_owned()];
        assert!(matches!(
            f.validate().unwrap_err(),
            ProductFormError::InvalidImageUrl(_)
        ));
    }
}
