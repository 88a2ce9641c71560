//! Shopping cart state.
//!
//! [`Cart`] is a plain value holding the session's ordered line items.
//! [`CartStore`] wraps one in a `watch` channel so consumers can observe every
//! effective change. Aggregates are never stored; they are recomputed from the
//! items on each read.
//!
//! The HTTP layer restores a store from the session with
//! [`CartStore::from_snapshot`], mutates it, and writes [`CartStore::snapshot`]
//! back.

mod summary;

pub use summary::OrderSummary;

use std::sync::Arc;

use carter_chaos_core::{ProductId, VariantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::sanity::{Color, Size};

// =============================================================================
// CartItem
// =============================================================================

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product ID. Several lines may share one.
    pub id: ProductId,
    pub title: String,
    pub variant_id: VariantId,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
    /// Unit price.
    pub price: Decimal,
    /// Resolved image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered cart lines.
///
/// Mutators return whether the cart changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Append a line. Adding a product already in the cart creates a second
    /// line; a zero quantity is ignored.
    pub fn add_item(&mut self, item: CartItem) -> bool {
        if item.quantity == 0 {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove every line for the product.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Set the quantity on every line for the product.
    ///
    /// A quantity below 1 removes the lines instead.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        if quantity < 1 {
            return self.remove_item(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let mut changed = false;
        for item in self.items.iter_mut().filter(|item| &item.id == id) {
            if item.quantity != quantity {
                item.quantity = quantity;
                changed = true;
            }
        }
        changed
    }

    /// Remove all lines.
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.clear();
        true
    }
}

// =============================================================================
// CartStore
// =============================================================================

/// Observable cart container.
///
/// Clones share the same cart. Effective mutations publish the new cart to
/// every [`watch::Receiver`]; no-op mutations publish nothing.
#[derive(Debug, Clone)]
pub struct CartStore {
    state: Arc<watch::Sender<Cart>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// A store holding an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::from_snapshot(Cart::new())
    }

    /// A store holding a previously saved cart.
    #[must_use]
    pub fn from_snapshot(cart: Cart) -> Self {
        let (state, _) = watch::channel(cart);
        Self {
            state: Arc::new(state),
        }
    }

    /// A copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Observe cart changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.state.borrow().items().to_vec()
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.state.borrow().quantity()
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.state.borrow().total()
    }

    /// See [`Cart::add_item`].
    pub fn add_item(&self, item: CartItem) -> bool {
        self.state.send_if_modified(|cart| cart.add_item(item))
    }

    /// See [`Cart::remove_item`].
    pub fn remove_item(&self, id: &ProductId) -> bool {
        self.state.send_if_modified(|cart| cart.remove_item(id))
    }

    /// See [`Cart::update_quantity`].
    pub fn update_quantity(&self, id: &ProductId, quantity: i64) -> bool {
        self.state
            .send_if_modified(|cart| cart.update_quantity(id, quantity))
    }

    /// See [`Cart::clear`].
    pub fn clear(&self) -> bool {
        self.state.send_if_modified(Cart::clear)
    }
}
