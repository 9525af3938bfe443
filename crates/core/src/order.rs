//! Placed orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::checkout::DeliveryAddress;
use crate::types::{Money, OrderId, OrderStatus, PaymentMethod, ProductId, Size, UserId};

/// A purchased line, frozen at the price paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Money,
    pub image: Option<String>,
    pub size: Size,
    pub quantity: u32,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

impl From<CartLine> for OrderItem {
    fn from(line: CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name,
            price: line.unit_price,
            image: line.image,
            size: line.size,
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub amount: Money,
    pub address: DeliveryAddress,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment: bool,
    pub placed_at: DateTime<Utc>,
}

/// One purchased item with its order's details, for the "My Orders" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderHistoryRow {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub name: String,
    pub image: Option<String>,
    pub price: Money,
    pub size: Size,
    pub quantity: u32,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment: bool,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// Flatten orders into one row per item, newest order first.
    ///
    /// Items within an order keep their original order.
    #[must_use]
    pub fn flatten_for_history(orders: &[Self]) -> Vec<OrderHistoryRow> {
        let mut sorted: Vec<&Self> = orders.iter().collect();
        sorted.sort_by(|a, b| {
            b.placed_at
                .cmp(&a.placed_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        sorted
            .into_iter()
            .flat_map(|order| {
                order.items.iter().map(move |item| OrderHistoryRow {
                    order_id: order.id,
                    product_id: item.product_id,
                    name: item.name.clone(),
                    image: item.image.clone(),
                    price: item.price,
                    size: item.size,
                    quantity: item.quantity,
                    status: order.status,
                    payment_method: order.payment_method,
                    payment: order.payment,
                    placed_at: order.placed_at,
                })
            })
            .collect()
    }
}
