//! Shopping cart store.
//!
//! A [`CartStore`] is the single source of truth for what is in one shopper's
//! cart. Line items are keyed by `(product_id, size)`; the list never holds two
//! entries with the same key and never holds an entry with a quantity of zero.
//!
//! The count and subtotal are not stored. Every read folds over the current
//! items, so they cannot drift out of sync with the list.
//!
//! Each owner (in the storefront, one HTTP session) holds its own store and
//! mutates it only through [`CartStore::add_item`], [`CartStore::remove_item`],
//! [`CartStore::update_quantity`] and [`CartStore::clear`]. Every operation is
//! total: absent keys are no-ops, never errors.
//!
//! ```
//! use preface_core::{CartStore, LineItemCandidate, ProductId};
//! use rust_decimal::Decimal;
//!
//! let tee = LineItemCandidate {
//!     product_id: ProductId::from("1"),
//!     name: "Essential Black Tee".to_string(),
//!     image: "/assets/product-tshirt.jpg".to_string(),
//!     size: "M".to_string(),
//!     unit_price: Decimal::from(45),
//! };
//!
//! let mut cart = CartStore::new();
//! cart.add_item(tee.clone(), 2);
//! cart.add_item(tee, 1);
//!
//! assert_eq!(cart.items().len(), 1);
//! assert_eq!(cart.count(), 3);
//! assert_eq!(cart.subtotal(), Decimal::from(135));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// What the catalog hands the cart when a shopper adds a product.
///
/// Everything except the quantity. Name, image and unit price are a snapshot
/// taken at add time; the cart never re-reads them from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemCandidate {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    /// Selected variant (garment or shoe size). Part of the line identity.
    pub size: String,
    pub unit_price: Decimal,
}

/// One distinct purchasable configuration in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub size: String,
    pub unit_price: Decimal,
    /// Always at least 1 while the line is in a store.
    pub quantity: u32,
}

impl CartLineItem {
    fn from_candidate(candidate: LineItemCandidate, quantity: u32) -> Self {
        Self {
            product_id: candidate.product_id,
            name: candidate.name,
            image: candidate.image,
            size: candidate.size,
            unit_price: candidate.unit_price,
            quantity,
        }
    }

    /// Whether this line is the one identified by `(product_id, size)`.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, size: &str) -> bool {
        self.product_id == *product_id && self.size == size
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The cart aggregate.
///
/// Serializes as `{"items": [...]}` so a session can snapshot it. Derived
/// totals are never part of the snapshot. Deserializing replays the snapshot
/// through [`CartStore::add_item`], which restores the key and quantity
/// invariants even for a hand-edited snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CartSnapshot")]
pub struct CartStore {
    items: Vec<CartLineItem>,
}

#[derive(Deserialize)]
struct CartSnapshot {
    #[serde(default)]
    items: Vec<CartLineItem>,
}

impl From<CartSnapshot> for CartStore {
    fn from(snapshot: CartSnapshot) -> Self {
        let mut cart = Self::new();
        for line in snapshot.items {
            let quantity = line.quantity;
            let candidate = LineItemCandidate {
                product_id: line.product_id,
                name: line.name,
                image: line.image,
                size: line.size,
                unit_price: line.unit_price,
            };
            cart.add_item(candidate, quantity);
        }
        cart
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `quantity` units of `candidate`.
    ///
    /// If a line with the same `(product_id, size)` exists, its quantity grows
    /// by `quantity` and the candidate's name, image and price are discarded:
    /// the first snapshot wins. Otherwise a new line is appended.
    ///
    /// A quantity of zero changes nothing. Quantities saturate at `u32::MAX`.
    pub fn add_item(&mut self, candidate: LineItemCandidate, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.matches(&candidate.product_id, &candidate.size))
        {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }

        self.items.push(CartLineItem::from_candidate(candidate, quantity));
    }

    /// Remove the line for `(product_id, size)`, if present.
    pub fn remove_item(&mut self, product_id: &ProductId, size: &str) {
        self.items.retain(|line| !line.matches(product_id, size));
    }

    /// Set the quantity of the line for `(product_id, size)`.
    ///
    /// A quantity of zero or below removes the line. Quantities above
    /// `u32::MAX` saturate. No-op when the line is absent.
    pub fn update_quantity(&mut self, product_id: &ProductId, size: &str, quantity: i64) {
        let Some(index) = self
            .items
            .iter()
            .position(|line| line.matches(product_id, size))
        else {
            return;
        };

        if quantity <= 0 {
            self.items.remove(index);
            return;
        }

        if let Some(line) = self.items.get_mut(index) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// The line for `(product_id, size)`, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId, size: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.matches(product_id, size))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `unit_price * quantity` across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn candidate(id: &str, size: &str, price: i64) -> LineItemCandidate {
        LineItemCandidate {
            product_id: ProductId::from(id),
            name: format!("Product {id}"),
            image: format!("/assets/{id}.jpg"),
            size: size.to_string(),
            unit_price: Decimal::from(price),
        }
    }

    fn key(id: &str) -> ProductId {
        ProductId::from(id)
    }

    // =========================================================================
    // Shopper scenarios
    // =========================================================================

    #[test]
    fn test_add_to_empty_cart() {
        let mut cart = CartStore::new();
        cart.add_item(candidate("1", "M", 45), 2);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.count(), 2);
        assert_eq!(cart.subtotal(), Decimal::from(90));
    }

    #[test]
    fn test_merge_keeps_first_snapshot() {
        let mut cart = CartStore::new();
        cart.add_item(candidate("1", "M", 45), 2);

        let mut repriced = candidate("1", "M", 999);
        repriced.name = "Renamed Tee".to_string();
        cart.add_item(repriced, 1);

        let line = cart.line(&key("1"), "M").unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(line.unit_price, Decimal::from(45));
        assert_eq!(line.name, "Product 1");
        assert_eq!(cart.subtotal(), Decimal::from(135));
    }

    #[test]
    fn test_update_to_zero_empties_cart() {
        let mut cart = CartStore::new();
        cart.add_item(candidate("1", "M", 45), 2);
        cart.add_item(candidate("1", "M", 999), 1);

        cart.update_quantity(&key("1"), "M", 0);

        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    // =========================================================================
    // Identity
    // =========================================================================

    #[test]
    fn test_same_product_same_size_merges() {
        let mut cart = CartStore::new();
        cart.add_item(candidate("1", "M", 45), 2);
        cart.add_item(candidate("1", "M", 45), 3);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn test_same_product_different_size_is_distinct() {
        let mut cart = CartStore::new();
        cart.add_item(candidate("1", "M", 45), 1);
        cart.add_item(candidate("1", "L", 45), 1);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut cart = CartStore::new();
        cart.add_item(candidate("3", "10", 120), 1);
        cart.add_item(candidate("1", "M", 45), 1);
        cart.add_item(candidate("2", "32", 89), 1);
        cart.add_item(candidate("3", "10", 120), 4);

        let ids: Vec<&str> = cart
            .items()
            .iter()
            .map(|line| line.product_id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(candidate("1", "M", 45), 0);
        assert!(cart.is_empty());

        cart.add_item(candidate("1", "M", 45), 1);
        cart.add_item(candidate("1", "M", 45), 0);
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_add_saturates() {
        let mut cart = CartStore::new();
        cart.add_item(candidate("1", "M", 1), u32::MAX);
        cart.add_item(candidate("1", "M", 1), 5);
        assert_eq!(cart.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_negative_update_prunes_line() {
        let mut cart = CartStore::new();
        cart.add_item(candidate("1", "M", 45), 1);
        cart.add_item(candidate("2", "30", 89), 1);

        cart.update_quantity(&key("1"), "M", -3);

        assert_eq!(cart.items().len(), 1);
        assert!(cart.line(&key("1"), "M").is_none());

        // The pruned key is gone; removing it again changes nothing.
        let before = cart.clone();
        cart.remove_item(&key("1"), "M");
        assert_eq!(cart, before);
    }

    #[test]
    fn test_update_sets_quantity() {
        let mut cart = CartStore::new();
        cart.add_item(candidate("2", "30", 89), 1);
        cart.update_quantity(&key("2"), "30", 4);

        assert_eq!(cart.count(), 4);
        assert_eq!(cart.subtotal(), Decimal::from(356));
    }

    #[test]
    fn test_update_saturates_large_quantity() {
        let mut cart = CartStore::new();
        cart.add_item(candidate("2", "30", 1), 1);
        cart.update_quantity(&key("2"), "30", i64::MAX);
        assert_eq!(cart.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_update_missing_line_is_noop() {
        let mut cart = CartStore::new();
        cart.update_quantity(&key("1"), "M", 3);
        assert!(cart.is_empty());

        cart.add_item(candidate("1", "M", 45), 1);
        cart.update_quantity(&key("1"), "L", 0);
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut once = CartStore::new();
        once.add_item(candidate("1", "M", 45), 1);
        once.add_item(candidate("1", "L", 45), 2);
        let mut twice = once.clone();

        once.remove_item(&key("1"), "M");
        twice.remove_item(&key("1"), "M");
        twice.remove_item(&key("1"), "M");

        assert_eq!(once, twice);
        assert_eq!(once.count(), 2);
    }

    #[test]
    fn test_remove_on_empty_cart() {
        let mut cart = CartStore::new();
        cart.remove_item(&key("9"), "XL");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = CartStore::new();
        cart.add_item(candidate("1", "M", 45), 2);
        cart.add_item(candidate("6", "9", 135), 1);

        cart.clear();

        assert!(cart.items().is_empty());
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_fractional_prices() {
        let mut cart = CartStore::new();
        let mut tee = candidate("4", "S", 0);
        tee.unit_price = Decimal::new(4299, 2);
        cart.add_item(tee, 3);

        assert_eq!(cart.subtotal(), Decimal::new(12_897, 2));
        assert_eq!(cart.items()[0].line_total(), Decimal::new(12_897, 2));
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    #[test]
    fn test_snapshot_holds_items_only() {
        let mut cart = CartStore::new();
        cart.add_item(candidate("1", "M", 45), 2);

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert_eq!(json["items"][0]["quantity"], 2);

        let restored: CartStore = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_snapshot_rehydration_restores_invariants() {
        let json = serde_json::json!({
            "items": [
                {"product_id": "1", "name": "Tee", "image": "a.jpg", "size": "M", "unit_price": "45", "quantity": 2},
                {"product_id": "1", "name": "Other", "image": "b.jpg", "size": "M", "unit_price": "50", "quantity": 1},
                {"product_id": "2", "name": "Cargo", "image": "c.jpg", "size": "30", "unit_price": "89", "quantity": 0}
            ]
        });

        let cart: CartStore = serde_json::from_value(json).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.items()[0].name, "Tee");
        assert_eq!(cart.subtotal(), Decimal::from(135));
    }

    #[test]
    fn test_missing_snapshot_items_is_empty_cart() {
        let cart: CartStore = serde_json::from_str("{}").unwrap();
        assert!(cart.is_empty());
    }

    // =========================================================================
    // Invariants over random operation sequences
    // =========================================================================

    #[test]
    fn test_invariants_hold_for_random_sequences() {
        const IDS: [&str; 3] = ["1", "2", "3"];
        const SIZES: [&str; 3] = ["S", "M", "L"];

        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let mut cart = CartStore::new();

            for _ in 0..40 {
                let id = IDS[rng.random_range(0..IDS.len())];
                let size = SIZES[rng.random_range(0..SIZES.len())];

                match rng.random_range(0..10) {
                    0..=4 => {
                        let price = rng.random_range(1..200);
                        cart.add_item(candidate(id, size, price), rng.random_range(0..5));
                    }
                    5 | 6 => cart.update_quantity(&key(id), size, rng.random_range(-2..6)),
                    7 | 8 => cart.remove_item(&key(id), size),
                    _ => cart.clear(),
                }

                let items = cart.items();
                for (i, a) in items.iter().enumerate() {
                    assert!(a.quantity > 0, "non-positive quantity retained");
                    for b in items.iter().skip(i + 1) {
                        assert!(
                            !(a.product_id == b.product_id && a.size == b.size),
                            "duplicate (product_id, size) key"
                        );
                    }
                }

                let count: u64 = items.iter().map(|l| u64::from(l.quantity)).sum();
                let subtotal: Decimal = items
                    .iter()
                    .map(|l| l.unit_price * Decimal::from(l.quantity))
                    .sum();
                assert_eq!(cart.count(), count);
                assert_eq!(cart.subtotal(), subtotal);
            }
        }
    }
}
