//! Checkout: delivery details and turning a cart into an order draft.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::order::OrderItem;
use crate::types::{Money, PaymentMethod};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));
static ZIPCODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("valid regex"));
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));

/// Where and to whom an order is delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub zipcode: String,
    pub country: String,
    pub phone: String,
}

/// A single problem with a [`DeliveryAddress`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AddressError {
    #[error("First name is required.")]
    FirstNameRequired,
    #[error("Last name is required.")]
    LastNameRequired,
    #[error("Email is required.")]
    EmailRequired,
    #[error("Email address is invalid.")]
    EmailInvalid,
    #[error("Street address is required.")]
    StreetRequired,
    #[error("City is required.")]
    CityRequired,
    #[error("Zipcode is required.")]
    ZipcodeRequired,
    #[error("Zipcode must be exactly 6 digits.")]
    ZipcodeInvalid,
    #[error("Country is required.")]
    CountryRequired,
    #[error("Phone number is required.")]
    PhoneRequired,
    #[error("Phone number must be exactly 10 digits.")]
    PhoneInvalid,
}

impl DeliveryAddress {
    /// Check every field and report all problems, in form order.
    ///
    /// # Errors
    ///
    /// Returns the non-empty list of [`AddressError`]s.
    pub fn validate(&self) -> Result<(), Vec<AddressError>> {
        let mut errors = Vec::new();

        if blank(&self.first_name) {
            errors.push(AddressError::FirstNameRequired);
        }
        if blank(&self.last_name) {
            errors.push(AddressError::LastNameRequired);
        }
        if blank(&self.email) {
            errors.push(AddressError::EmailRequired);
        } else if !EMAIL_RE.is_match(self.email.trim()) {
            errors.push(AddressError::EmailInvalid);
        }
        if blank(&self.street) {
            errors.push(AddressError::StreetRequired);
        }
        if blank(&self.city) {
            errors.push(AddressError::CityRequired);
        }
        if blank(&self.zipcode) {
            errors.push(AddressError::ZipcodeRequired);
        } else if !ZIPCODE_RE.is_match(self.zipcode.trim()) {
            errors.push(AddressError::ZipcodeInvalid);
        }
        if blank(&self.country) {
            errors.push(AddressError::CountryRequired);
        }
        if blank(&self.phone) {
            errors.push(AddressError::PhoneRequired);
        } else if !PHONE_RE.is_match(self.phone.trim()) {
            errors.push(AddressError::PhoneInvalid);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Why a cart could not become an order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("invalid delivery address: {}", join_messages(.0))]
    InvalidAddress(Vec<AddressError>),
}

fn join_messages(errors: &[AddressError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// An order ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDraft {
    pub items: Vec<OrderItem>,
    /// Subtotal plus delivery fee.
    pub amount: Money,
    pub address: DeliveryAddress,
    pub payment_method: PaymentMethod,
}

impl OrderDraft {
    /// Price `cart` against `catalog` and attach delivery details.
    ///
    /// Lines for products no longer in the catalog are dropped. The delivery
    /// fee is always charged on a placed order.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidAddress`] if the address fails
    /// validation, or [`CheckoutError::EmptyCart`] if no orderable line remains.
    pub fn from_cart(
        cart: &Cart,
        catalog: &Catalog,
        delivery_fee: Money,
        address: DeliveryAddress,
        payment_method: PaymentMethod,
    ) -> Result<Self, CheckoutError> {
        address.validate().map_err(CheckoutError::InvalidAddress)?;

        let items: Vec<OrderItem> = cart
            .lines(catalog)
            .into_iter()
            .map(OrderItem::from)
            .collect();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let subtotal: Money = items.iter().map(OrderItem::line_total).sum();
        Ok(Self {
            items,
            amount: subtotal + delivery_fee,
            address,
            payment_method,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::fixtures::catalog;
    use crate::types::{ProductId, Size};

    pub fn address() -> DeliveryAddress {
        DeliveryAddress {
            first_name: "Asha".to_owned(),
            last_name: "Rao".to_owned(),
            email: "asha@example.in".to_owned(),
            street: "12 MG Road".to_owned(),
            city: "Bengaluru".to_owned(),
            state: "Karnataka".to_owned(),
            zipcode: "560001".to_owned(),
            country: "India".to_owned(),
            phone: "9876543210".to_owned(),
        }
    }

    #[test]
    fn test_valid_address() {
        assert!(address().validate().is_ok());
    }

    #[test]
    fn test_state_is_optional() {
        let addr = DeliveryAddress {
            state: String::new(),
            ..address()
        };
        assert!(addr.validate().is_ok());
    }

    #[test]
    fn test_reports_all_errors_in_form_order() {
        let errors = DeliveryAddress::default().validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                AddressError::FirstNameRequired,
                AddressError::LastNameRequired,
                AddressError::EmailRequired,
                AddressError::StreetRequired,
                AddressError::CityRequired,
                AddressError::ZipcodeRequired,
                AddressError::CountryRequired,
                AddressError::PhoneRequired,
            ]
        );
    }

    #[test]
    fn test_format_errors() {
        let addr = DeliveryAddress {
            email: "asha@example".to_owned(),
            zipcode: "56001".to_owned(),
            phone: "98765-43210".to_owned(),
            ..address()
        };
        assert_eq!(
            addr.validate().unwrap_err(),
            vec![
                AddressError::EmailInvalid,
                AddressError::ZipcodeInvalid,
                AddressError::PhoneInvalid
            ]
        );
    }

    #[test]
    fn test_address_json_uses_form_field_names() {
        let json = serde_json::to_value(address()).unwrap();
        assert_eq!(json["firstName"], "Asha");
        assert_eq!(json["zipcode"], "560001");
    }

    #[test]
    fn test_draft_prices_cart_and_adds_fee() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.set_quantity(ProductId::new(2), Size::M, 2);
        cart.set_quantity(ProductId::new(4), Size::S, 1);
        cart.set_quantity(ProductId::new(99), Size::S, 1);

        let draft = OrderDraft::from_cart(
            &cart,
            &catalog,
            Money::from_major(10),
            address(),
            PaymentMethod::Cod,
        )
        .unwrap();

        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.amount, Money::from_major(2 * 400 + 900 + 10));
    }

    #[test]
    fn test_draft_rejects_empty_cart() {
        let err = OrderDraft::from_cart(
            &Cart::new(),
            &catalog(),
            Money::from_major(10),
            address(),
            PaymentMethod::Stripe,
        )
        .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[test]
    fn test_draft_rejects_bad_address_before_pricing() {
        let err = OrderDraft::from_cart(
            &Cart::new(),
            &catalog(),
            Money::ZERO,
            DeliveryAddress::default(),
            PaymentMethod::Cod,
        )
        .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidAddress(ref e) if e.len() == 8));
        assert!(err.to_string().starts_with("invalid delivery address: First name is required."));
    }
}
