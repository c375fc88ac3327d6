//! Item types and the bounded `Inventory` every building carries.

use crate::rng::SimRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A resource kind. Doubles as the deposit type of a tile and as the item
/// type stored in inventories; extraction turns one into the other 1:1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Iron,
    Coal,
    Copper,
    Gold,
}

impl ItemType {
    /// All item types, in declaration order.
    pub fn all() -> [ItemType; 4] {
        [ItemType::Iron, ItemType::Coal, ItemType::Copper, ItemType::Gold]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemType::Iron => "iron",
            ItemType::Coal => "coal",
            ItemType::Copper => "copper",
            ItemType::Gold => "gold",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Default aggregate capacity for buildings that do not declare their own.
pub const DEFAULT_CAPACITY: u32 = 999;

/// Bounded per-item-type counters with a single aggregate capacity.
///
/// The capacity bound is strict: an `add` that would bring the total to
/// `capacity` or beyond is rejected outright, so `total() < capacity` holds
/// after every operation. Zero-count entries are pruned and never appear in
/// enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    capacity: u32,
    bag: BTreeMap<ItemType, u32>,
}

impl Inventory {
    /// Create an inventory with the given aggregate capacity.
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            bag: BTreeMap::new(),
        }
    }

    /// An inventory that admits exactly one item: under the strict capacity
    /// bound, capacity 2 accepts a unit only while empty. Used by conveyor
    /// segments and loader buffers.
    pub fn single_item() -> Self {
        Self::new(2)
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Add items, all or nothing. Fails when the result would reach or
    /// exceed capacity.
    #[must_use = "a rejected add means the items were not stored"]
    pub fn add(&mut self, kind: ItemType, amount: u32) -> bool {
        if !self.can_accept(amount) {
            return false;
        }
        if amount > 0 {
            *self.bag.entry(kind).or_insert(0) += amount;
        }
        true
    }

    /// Remove items, all or nothing. Returns the amount actually removed:
    /// `amount` when enough are present, otherwise 0.
    #[must_use = "returns the quantity actually removed, which may be 0"]
    pub fn remove(&mut self, kind: ItemType, amount: u32) -> u32 {
        match self.bag.get_mut(&kind) {
            Some(count) if *count >= amount => {
                *count -= amount;
                if *count == 0 {
                    self.bag.remove(&kind);
                }
                amount
            }
            _ => 0,
        }
    }

    /// Drain every unit of one item type. Returns the drained amount.
    pub fn remove_all(&mut self, kind: ItemType) -> u32 {
        self.bag.remove(&kind).unwrap_or(0)
    }

    /// Whether one more unit fits.
    pub fn can_accept_item(&self) -> bool {
        self.can_accept(1)
    }

    /// Whether `amount` more units fit under the strict bound.
    pub fn can_accept(&self, amount: u32) -> bool {
        (self.total() as u64 + amount as u64) < self.capacity as u64
    }

    pub fn count(&self, kind: ItemType) -> u32 {
        self.bag.get(&kind).copied().unwrap_or(0)
    }

    /// Total units across all types.
    pub fn total(&self) -> u32 {
        self.bag.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bag.is_empty()
    }

    pub fn has_items(&self) -> bool {
        !self.bag.is_empty()
    }

    /// Item types with a positive count, in sorted order.
    pub fn item_types(&self) -> impl Iterator<Item = ItemType> + '_ {
        self.bag.keys().copied()
    }

    /// A uniformly random item type among those present, or `None` when
    /// empty. For single-type holders (conveyors) this is simply the one
    /// type present.
    pub fn random_item_type(&self, rng: &mut SimRng) -> Option<ItemType> {
        let index = rng.next_index(self.bag.len())?;
        self.bag.keys().nth(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() {
        let mut inv = Inventory::new(100);
        assert!(inv.add(ItemType::Iron, 50));
        assert_eq!(inv.count(ItemType::Iron), 50);

        assert_eq!(inv.remove(ItemType::Iron, 30), 30);
        assert_eq!(inv.count(ItemType::Iron), 20);
    }

    #[test]
    fn add_rejects_exact_fill() {
        let mut inv = Inventory::new(10);
        // 9 leaves the total strictly below capacity; 10 would fill it.
        assert!(inv.add(ItemType::Iron, 9));
        assert!(!inv.add(ItemType::Iron, 1));
        assert_eq!(inv.total(), 9);
    }

    #[test]
    fn add_is_all_or_nothing() {
        let mut inv = Inventory::new(10);
        assert!(!inv.add(ItemType::Iron, 15));
        assert_eq!(inv.total(), 0);
    }

    #[test]
    fn remove_more_than_available_removes_nothing() {
        let mut inv = Inventory::new(100);
        assert!(inv.add(ItemType::Iron, 5));
        assert_eq!(inv.remove(ItemType::Iron, 10), 0);
        assert_eq!(inv.count(ItemType::Iron), 5);
    }

    #[test]
    fn remove_absent_type_returns_zero() {
        let mut inv = Inventory::new(100);
        assert_eq!(inv.remove(ItemType::Gold, 1), 0);
    }

    #[test]
    fn remove_all_drains() {
        let mut inv = Inventory::new(100);
        assert!(inv.add(ItemType::Coal, 7));
        assert_eq!(inv.remove_all(ItemType::Coal), 7);
        assert_eq!(inv.count(ItemType::Coal), 0);
        assert_eq!(inv.remove_all(ItemType::Coal), 0);
    }

    #[test]
    fn zero_count_entries_are_pruned() {
        let mut inv = Inventory::new(100);
        assert!(inv.add(ItemType::Iron, 1));
        assert_eq!(inv.remove(ItemType::Iron, 1), 1);
        assert!(inv.is_empty());
        assert_eq!(inv.item_types().count(), 0);
    }

    #[test]
    fn zero_amount_add_creates_no_entry() {
        let mut inv = Inventory::new(100);
        assert!(inv.add(ItemType::Iron, 0));
        assert!(inv.is_empty());
        assert_eq!(inv.item_types().count(), 0);
    }

    #[test]
    fn capacity_is_aggregate_not_per_type() {
        let mut inv = Inventory::new(10);
        assert!(inv.add(ItemType::Iron, 5));
        assert!(inv.add(ItemType::Coal, 4));
        // Total is 9; any further unit would fill capacity.
        assert!(!inv.add(ItemType::Gold, 1));
    }

    #[test]
    fn single_item_inventory_holds_exactly_one() {
        let mut inv = Inventory::single_item();
        assert!(inv.can_accept_item());
        assert!(inv.add(ItemType::Iron, 1));
        assert!(!inv.can_accept_item());
        assert!(!inv.add(ItemType::Iron, 1));
        assert_eq!(inv.total(), 1);
    }

    #[test]
    fn random_item_type_uniform_over_present() {
        let mut inv = Inventory::new(100);
        assert!(inv.add(ItemType::Iron, 1));
        assert!(inv.add(ItemType::Coal, 1));

        let mut rng = SimRng::new(99);
        let mut seen_iron = false;
        let mut seen_coal = false;
        for _ in 0..100 {
            match inv.random_item_type(&mut rng) {
                Some(ItemType::Iron) => seen_iron = true,
                Some(ItemType::Coal) => seen_coal = true,
                other => panic!("unexpected pick: {other:?}"),
            }
        }
        assert!(seen_iron && seen_coal);
    }

    #[test]
    fn random_item_type_empty_returns_none() {
        let inv = Inventory::new(10);
        let mut rng = SimRng::new(1);
        assert_eq!(inv.random_item_type(&mut rng), None);
    }
}
