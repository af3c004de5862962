//! Orders.
//!
//! The server owns orders. The client reads the current user's orders and
//! creates new ones; it never edits or deletes an existing order.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderStatus, Price, ProductId};

/// A line of a placed order, priced by the server at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Price,
}

impl OrderItem {
    /// Quantity times the recorded unit price.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// An order as returned by `GET /orders/my` and `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sum of the recorded line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(OrderItem::subtotal).sum()
    }
}

/// One requested line of a new order.
///
/// Carries no price: the server prices the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrder {
    pub items: Vec<NewOrderItem>,
}
