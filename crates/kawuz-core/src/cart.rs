//! # Cart
//!
//! The in-memory shopping cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  User Action              Reducer Action          Cart Change           │
//! │  ───────────              ──────────────          ───────────           │
//! │                                                                         │
//! │  "Add to cart" ─────────► AddToCart ────────────► lines.push(line)     │
//! │                                                                         │
//! │  "Remove" on row i ─────► RemoveFromCart(i) ────► lines.remove(i)      │
//! │                                                   (no-op if i >= len)  │
//! │                                                                         │
//! │  Order accepted ────────► CheckoutSucceeded ────► lines.clear()        │
//! │                                                                         │
//! │  Logout ────────────────► LoggedOut ────────────► lines.clear()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Insertion order is display order.
//! - No de-duplication: adding the same product twice yields two lines,
//!   each with quantity 1.
//! - The cart is never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{OrderLine, Product, ProductId};

/// A single product selection in the cart.
///
/// ## Price Freezing
/// Name and price are copied from the product when it is added, so the cart
/// keeps showing what the user picked even if the catalog is re-fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Builds a line from a product snapshot.
    pub fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Order line submitted for this cart line.
    pub fn order_line(&self) -> OrderLine {
        OrderLine {
            product_id: self.product_id,
            quantity: self.quantity,
        }
    }
}

/// The shopping cart: an ordered list of lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Appends a line for `product`.
    pub fn add(&mut self, product: &Product) {
        self.lines.push(CartLine::from_product(product));
    }

    /// Removes the line at `index`.
    ///
    /// Returns the removed line, or `None` (cart unchanged) when the index is
    /// out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<CartLine> {
        if index < self.lines.len() {
            Some(self.lines.remove(index))
        } else {
            None
        }
    }

    /// Sum of unit prices over all lines.
    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .map(|line| line.unit_price)
            .sum()
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// One order line per cart line, in display order.
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.lines.iter().map(CartLine::order_line).collect()
    }
}
