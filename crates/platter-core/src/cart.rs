//! # Cart
//!
//! Line items and cart math.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  add_item(menu item) ───► same id present? ── yes ──► quantity += 1     │
//! │                                 │                                       │
//! │                                 └──── no ──► push(quantity = 1)         │
//! │                                                                         │
//! │  increment(id) ─────────► quantity += 1                                 │
//! │  decrement(id) ─────────► quantity -= 1, never below 1                  │
//! │  remove(id) ────────────► line dropped regardless of quantity           │
//! │  clear() ───────────────► no lines                                      │
//! │                                                                         │
//! │  total() ───────────────► Σ price × quantity, computed on every read    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::MenuItem;

/// An item in the cart.
///
/// The menu item's fields are frozen when first added so the cart keeps
/// displaying consistently even if the menu changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Menu item ID; a cart holds at most one line per ID.
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    pub price: Money,

    #[serde(default)]
    pub image: String,

    /// Always at least 1 while the line exists.
    pub quantity: u32,
}

impl CartItem {
    /// Creates a cart line with quantity 1.
    pub fn from_menu_item(item: &MenuItem) -> Self {
        CartItem {
            id: item.id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price,
            image: item.image.clone(),
            quantity: 1,
        }
    }

    /// Calculates the line total (price × quantity).
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `id` (adding the same item increases quantity)
/// - Every line has quantity ≥ 1
/// - Lines keep insertion order
///
/// Persisted as `{"cart": [...]}`. Loading a persisted cart re-establishes
/// the invariants: duplicate ids are merged and zero quantities dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CartSnapshot", into = "CartSnapshot")]
pub struct Cart {
    items: Vec<CartItem>,
}

#[derive(Serialize, Deserialize)]
struct CartSnapshot {
    #[serde(default)]
    cart: Vec<CartItem>,
}

impl From<CartSnapshot> for Cart {
    fn from(snapshot: CartSnapshot) -> Self {
        let mut cart = Cart::new();
        for line in snapshot.cart.into_iter().filter(|l| l.quantity > 0) {
            match cart.items.iter_mut().find(|i| i.id == line.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity)
                }
                None => cart.items.push(line),
            }
        }
        cart
    }
}

impl From<Cart> for CartSnapshot {
    fn from(cart: Cart) -> Self {
        CartSnapshot { cart: cart.items }
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up a line by menu item ID.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Quantity of a line, if present.
    pub fn quantity_of(&self, id: &str) -> Option<u32> {
        self.get(id).map(|i| i.quantity)
    }

    /// Adds a menu item, or bumps its quantity if already present.
    ///
    /// Returns the line's new quantity.
    pub fn add_item(&mut self, item: &MenuItem) -> u32 {
        if let Some(line) = self.items.iter_mut().find(|i| i.id == item.id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }

        self.items.push(CartItem::from_menu_item(item));
        1
    }

    /// Increases a line's quantity by one.
    ///
    /// Returns the new quantity, or `None` if the id is not in the cart.
    pub fn increment(&mut self, id: &str) -> Option<u32> {
        let line = self.items.iter_mut().find(|i| i.id == id)?;
        line.quantity = line.quantity.saturating_add(1);
        Some(line.quantity)
    }

    /// Decreases a line's quantity by one, stopping at 1.
    ///
    /// Removing a line is a separate, explicit action. Returns the resulting
    /// quantity, or `None` if the id is not in the cart.
    pub fn decrement(&mut self, id: &str) -> Option<u32> {
        let line = self.items.iter_mut().find(|i| i.id == id)?;
        if line.quantity > 1 {
            line.quantity -= 1;
        }
        Some(line.quantity)
    }

    /// Removes a line regardless of its quantity.
    pub fn remove(&mut self, id: &str) -> Option<CartItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Σ price × quantity over current lines.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: i64) -> MenuItem {
        MenuItem::new(id, format!("Dish {id}"), Money::from_units(price))
    }

    #[test]
    fn test_add_merges_same_item() {
        let mut cart = Cart::new();
        let a = item("a", 10);

        for expected in 1..=5 {
            assert_eq!(cart.add_item(&a), expected);
        }

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.quantity_of("a"), Some(5));
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(&item("b", 5));
        cart.add_item(&item("a", 10));
        cart.add_item(&item("b", 5));

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_decrement_floors_at_one() {
        let mut cart = Cart::new();
        cart.add_item(&item("a", 10));
        cart.add_item(&item("a", 10));

        assert_eq!(cart.decrement("a"), Some(1));
        assert_eq!(cart.decrement("a"), Some(1));
        assert_eq!(cart.quantity_of("a"), Some(1));
        assert_eq!(cart.decrement("missing"), None);
    }

    #[test]
    fn test_remove_drops_line_regardless_of_quantity() {
        let mut cart = Cart::new();
        let a = item("a", 10);
        for _ in 0..4 {
            cart.add_item(&a);
        }

        let removed = cart.remove("a").unwrap();
        assert_eq!(removed.quantity, 4);
        assert!(cart.is_empty());
        assert!(cart.remove("a").is_none());
    }

    #[test]
    fn test_worked_example() {
        let mut cart = Cart::new();
        let a = item("a", 10);

        cart.add_item(&a);
        assert_eq!(cart.total(), Money::from_units(10));

        cart.add_item(&a);
        assert_eq!(cart.quantity_of("a"), Some(2));
        assert_eq!(cart.total(), Money::from_units(20));

        cart.increment("a");
        assert_eq!(cart.quantity_of("a"), Some(3));
        assert_eq!(cart.total(), Money::from_units(30));

        cart.remove("a");
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
    }

    #[test]
    fn test_total_tracks_every_mutation() {
        let mut cart = Cart::new();
        cart.add_item(&item("a", 10));
        cart.add_item(&item("b", 7));
        cart.increment("b");
        cart.decrement("a");

        let expected: i64 = cart
            .items()
            .iter()
            .map(|i| i.price.units() * i64::from(i.quantity))
            .sum();
        assert_eq!(cart.total(), Money::from_units(expected));
        assert_eq!(cart.total(), Money::from_units(24));
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&item("a", 10));
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
    }

    #[test]
    fn test_persisted_shape_and_repair() {
        let mut cart = Cart::new();
        cart.add_item(&item("a", 10));
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["cart"][0]["_id"], "a");
        assert_eq!(json["cart"][0]["quantity"], 1);

        let repaired: Cart = serde_json::from_value(serde_json::json!({
            "cart": [
                { "_id": "a", "name": "A", "price": 10, "quantity": 2 },
                { "_id": "b", "name": "B", "price": 5, "quantity": 0 },
                { "_id": "a", "name": "A", "price": 10, "quantity": 1 }
            ]
        }))
        .unwrap();
        assert_eq!(repaired.line_count(), 1);
        assert_eq!(repaired.quantity_of("a"), Some(3));
    }

    #[test]
    fn test_repair_saturates_merged_quantity() {
        let repaired: Cart = serde_json::from_value(serde_json::json!({
            "cart": [
                { "_id": "a", "name": "A", "price": 10, "quantity": 4294967295u32 },
                { "_id": "a", "name": "A", "price": 10, "quantity": 1 },
                { "_id": "b", "name": "B", "price": 1, "quantity": 4294967295u32 }
            ]
        }))
        .unwrap();

        assert_eq!(repaired.line_count(), 2);
        assert_eq!(repaired.quantity_of("a"), Some(u32::MAX));
        assert_eq!(repaired.total_quantity(), u32::MAX);
    }

    #[test]
    fn test_quantity_and_total_saturate() {
        let mut cart: Cart = serde_json::from_value(serde_json::json!({
            "cart": [{ "_id": "a", "name": "A", "price": 1, "quantity": 4294967295u32 }]
        }))
        .unwrap();
        assert_eq!(cart.add_item(&item("a", 1)), u32::MAX);
        assert_eq!(cart.increment("a"), Some(u32::MAX));

        let huge = item("h", i64::MAX / 2 + 1);
        let mut cart = Cart::new();
        cart.add_item(&huge);
        cart.add_item(&huge);
        assert_eq!(cart.quantity_of("h"), Some(2));
        assert_eq!(cart.total(), Money::from_units(i64::MAX));
        assert!(cart.total() > Money::zero());
    }
}
