//! The shopping cart aggregate.
//!
//! A cart is an ordered list of line items, at most one per product. Each
//! line captures the product name and unit price when it is first added;
//! later catalog price changes are not applied to lines already in the cart.
//! The server prices the order itself, so the captured price only drives
//! what the customer sees before checkout.
//!
//! The cart lives in memory only and is never persisted.

use serde::Serialize;

use crate::order::{NewOrder, NewOrderItem};
use crate::product::Product;
use crate::types::{Price, ProductId};

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub product_id: ProductId,
    /// Always at least 1 while the line exists.
    pub quantity: u32,
    /// Product name when the line was created.
    pub name: String,
    /// Unit price when the line was created.
    pub unit_price: Price,
}

impl LineItem {
    /// Quantity times the captured unit price.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// In-memory shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line for this product, or appends a new line
    /// with quantity 1 capturing the product's current name and price.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }
        self.lines.push(LineItem {
            product_id: product.id,
            quantity: 1,
            name: product.name.clone(),
            unit_price: product.price,
        });
    }

    /// Increase a line's quantity by one. No-op if the product is absent.
    pub fn increment(&mut self, product_id: ProductId) {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = line.quantity.saturating_add(1);
        }
    }

    /// Decrease a line's quantity by one, never below 1.
    ///
    /// Removing a line takes an explicit [`Self::remove`].
    pub fn decrement(&mut self, product_id: ProductId) {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = line.quantity.saturating_sub(1).max(1);
        }
    }

    /// Delete a line entirely. No-op if the product is absent.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of quantity times captured unit price over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(LineItem::subtotal).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Build the order request: product IDs and quantities only.
    ///
    /// Returns `None` for an empty cart.
    #[must_use]
    pub fn to_order(&self) -> Option<NewOrder> {
        if self.is_empty() {
            return None;
        }
        Some(NewOrder {
            items: self
                .lines
                .iter()
                .map(|line| NewOrderItem {
                    product_id: line.product_id,
                    quantity: line.quantity,
                })
                .collect(),
        })
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut LineItem> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}
