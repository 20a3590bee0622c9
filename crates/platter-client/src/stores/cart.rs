//! # Cart Store
//!
//! Observable wrapper around [`Cart`] with save-after-mutate persistence.
//! No network calls.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller               CartStore                Side effects             │
//! │  ──────               ─────────                ────────────             │
//! │                                                                         │
//! │  add_to_cart ───────► cart.add_item ─────────► subscribers woken        │
//! │  increment_quantity ► cart.increment           snapshot saved under     │
//! │  decrement_quantity ► cart.decrement           "cart-store"             │
//! │  remove_from_cart ──► cart.remove                                       │
//! │  clear_cart ────────► cart.clear                                        │
//! │                                                                         │
//! │  total() ───────────► Σ price × quantity (read only)                    │
//! │                                                                         │
//! │  NOTE: a failed save is logged; the in-memory change stands.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use platter_core::validation::validate_menu_item;
use platter_core::{Cart, CartItem, MenuItem, Money};
use platter_storage::StateStorage;
use tokio::sync::watch;
use tracing::debug;

use crate::error::ClientResult;
use crate::persist::PersistSlot;
use crate::state::StateCell;

/// Storage key of the persisted cart.
pub const CART_STORE_KEY: &str = "cart-store";

const CART_STORE_VERSION: u32 = 0;

/// Shopping cart store.
#[derive(Debug)]
pub struct CartStore {
    state: StateCell<Cart>,
    persist: PersistSlot,
}

impl CartStore {
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        CartStore {
            state: StateCell::default(),
            persist: PersistSlot::new(storage, CART_STORE_KEY, CART_STORE_VERSION),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one of `item`, merging with an existing line of the same id.
    ///
    /// Returns the line's new quantity.
    pub async fn add_to_cart(&self, item: &MenuItem) -> ClientResult<u32> {
        validate_menu_item(item)?;

        let mut quantity = 0;
        self.state.update(|cart| quantity = cart.add_item(item));
        debug!(id = %item.id, quantity, "Added to cart");

        self.save().await;
        Ok(quantity)
    }

    /// Adds one to a line. Returns `None` if the id is not in the cart.
    pub async fn increment_quantity(&self, id: &str) -> Option<u32> {
        let mut quantity = None;
        self.state.update_if(|cart| {
            quantity = cart.increment(id);
            quantity.is_some()
        });

        if quantity.is_some() {
            self.save().await;
        }
        quantity
    }

    /// Takes one from a line, never going below 1. Returns `None` if the id
    /// is not in the cart.
    pub async fn decrement_quantity(&self, id: &str) -> Option<u32> {
        let mut changed = false;
        let mut quantity = None;
        self.state.update_if(|cart| {
            let before = cart.quantity_of(id);
            quantity = cart.decrement(id);
            changed = quantity.is_some() && quantity != before;
            changed
        });

        if changed {
            self.save().await;
        }
        quantity
    }

    /// Drops a line whatever its quantity.
    pub async fn remove_from_cart(&self, id: &str) -> Option<CartItem> {
        let mut removed = None;
        self.state.update_if(|cart| {
            removed = cart.remove(id);
            removed.is_some()
        });

        if removed.is_some() {
            debug!(id, "Removed from cart");
            self.save().await;
        }
        removed
    }

    /// Empties the cart.
    pub async fn clear_cart(&self) {
        self.state.update(Cart::clear);
        debug!("Cart cleared");
        self.save().await;
    }

    /// Loads the persisted cart, replacing the in-memory one.
    pub async fn restore(&self) -> ClientResult<()> {
        if let Some(cart) = self.persist.load::<Cart>().await? {
            debug!(lines = cart.line_count(), "Cart restored");
            self.state.update(|current| *current = cart);
        }
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn items(&self) -> Vec<CartItem> {
        self.state.read(|cart| cart.items().to_vec())
    }

    pub fn total(&self) -> Money {
        self.state.read(Cart::total)
    }

    pub fn total_quantity(&self) -> u32 {
        self.state.read(Cart::total_quantity)
    }

    pub fn line_count(&self) -> usize {
        self.state.read(Cart::line_count)
    }

    pub fn quantity_of(&self, id: &str) -> Option<u32> {
        self.state.read(|cart| cart.quantity_of(id))
    }

    pub fn is_empty(&self) -> bool {
        self.state.read(Cart::is_empty)
    }

    pub fn snapshot(&self) -> Cart {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    async fn save(&self) {
        let cart = self.snapshot();
        self.persist.save_or_warn(&cart).await;
    }
}
