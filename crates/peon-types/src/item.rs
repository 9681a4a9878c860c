//! Items, the player inventory, open container windows, and the fixed item
//! catalogs the behaviors rank against.

use std::ops::Range;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Catalogs
// ────────────────────────────────────────────────────────────────────────────

/// Mob types the defend behavior targets by default.
pub const HOSTILE_MOBS: &[&str] = &[
    "Blaze",
    "Cave Spider",
    "Creeper",
    "Enderman",
    "Endermite",
    "Ghast",
    "Guardian",
    "Magma Cube",
    "Silverfish",
    "Skeleton",
    "Slime",
    "Spider",
    "Witch",
    "Wither Skeleton",
    "Zombie",
    "Zombie Pigman",
];

/// Weapons, best first.
pub const WEAPONS: &[&str] = &[
    "Diamond Sword",
    "Golden Sword",
    "Iron Sword",
    "Stone Sword",
    "Wooden Sword",
];

/// Food, most preferred first.
pub const FOOD: &[&str] = &[
    "Cooked Beef",
    "Cooked Porkchop",
    "Cooked Mutton",
    "Cooked Chicken",
    "Cooked Rabbit",
    "Cooked Fish",
    "Baked Potato",
    "Bread",
    "Carrot",
    "Apple",
    "Cookie",
    "Melon",
];

/// Armor materials, best first.
pub const ARMOR_MATERIALS: &[&str] = &["Diamond", "Iron", "Chainmail", "Golden", "Leather"];

// ────────────────────────────────────────────────────────────────────────────
// ItemStack
// ────────────────────────────────────────────────────────────────────────────

/// A stack of identical items occupying one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub name: String,
    pub count: u32,
}

impl ItemStack {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }

    /// Leading word of the item name, e.g. `"Iron"` for `"Iron Helmet"`.
    pub fn material(&self) -> &str {
        self.name.split(' ').next().unwrap_or_default()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Armor slots
// ────────────────────────────────────────────────────────────────────────────

/// Equipment slots in the player inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmorSlot {
    Helmet,
    Chestplate,
    Leggings,
    Boots,
}

impl ArmorSlot {
    pub const ALL: [ArmorSlot; 4] = [
        ArmorSlot::Helmet,
        ArmorSlot::Chestplate,
        ArmorSlot::Leggings,
        ArmorSlot::Boots,
    ];

    /// Inventory slot index holding this piece.
    pub fn slot_index(self) -> usize {
        match self {
            ArmorSlot::Helmet => 5,
            ArmorSlot::Chestplate => 6,
            ArmorSlot::Leggings => 7,
            ArmorSlot::Boots => 8,
        }
    }

    /// Piece name suffix, joined with a material to form an item name.
    pub fn piece(self) -> &'static str {
        match self {
            ArmorSlot::Helmet => "Helmet",
            ArmorSlot::Chestplate => "Chestplate",
            ArmorSlot::Leggings => "Leggings",
            ArmorSlot::Boots => "Boots",
        }
    }

    pub fn item_name(self, material: &str) -> String {
        format!("{material} {}", self.piece())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Inventory
// ────────────────────────────────────────────────────────────────────────────

/// Total number of player inventory slots.
pub const INVENTORY_SIZE: usize = 45;
/// Main storage slots.
pub const MAIN_SLOTS: Range<usize> = 9..36;
/// Hotbar slots; the held item is always one of these.
pub const HOTBAR_SLOTS: Range<usize> = 36..45;
/// Storage slots searched by [`Inventory::contains`] and [`Inventory::index`].
pub const STORAGE_SLOTS: Range<usize> = 9..45;

/// Snapshot of the player inventory.
///
/// Slot layout: 0 crafting output, 1–4 crafting grid, 5–8 armor, 9–35 main
/// storage, 36–44 hotbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    /// An empty inventory.
    pub fn new() -> Self {
        Self {
            slots: vec![None; INVENTORY_SIZE],
        }
    }

    pub fn slot(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Place `item` in `index`.  Out-of-range indices are ignored.
    pub fn set_slot(&mut self, index: usize, item: Option<ItemStack>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = item;
        }
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index(name).is_some()
    }

    /// Lowest storage slot holding an item called `name`.
    pub fn index(&self, name: &str) -> Option<usize> {
        STORAGE_SLOTS.into_iter().find(|&i| matches!(self.slot(i), Some(s) if s.name == name))
    }

    /// Lowest empty slot within `range`.
    pub fn first_empty(&self, range: Range<usize>) -> Option<usize> {
        range.into_iter().find(|&i| self.slots.get(i).is_some_and(Option::is_none))
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        if a < self.slots.len() && b < self.slots.len() {
            self.slots.swap(a, b);
        }
    }

    /// Total count of `name` across storage slots.
    pub fn count(&self, name: &str) -> u32 {
        STORAGE_SLOTS
            .into_iter()
            .filter_map(|i| self.slot(i))
            .filter(|s| s.name == name)
            .map(|s| s.count)
            .sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Container windows
// ────────────────────────────────────────────────────────────────────────────

/// How a window slot is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickMode {
    /// Pick up / put down the stack under the cursor.
    Normal,
    /// Move the whole stack to the other section of the window.
    Shift,
}

/// Snapshot of an open container window.
///
/// Window slot numbering starts with the container's own slots
/// (`custom`), followed by the player's storage slots (`player`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowView {
    pub custom: Vec<Option<ItemStack>>,
    pub player: Vec<Option<ItemStack>>,
}

impl WindowView {
    /// `true` when the container has at least one empty slot.
    pub fn has_free_slot(&self) -> bool {
        self.custom.iter().any(Option::is_none)
    }

    pub fn player_contains(&self, name: &str) -> bool {
        self.player_position(name).is_some()
    }

    /// Window slot number of the first player stack called `name`.
    pub fn window_index(&self, name: &str) -> Option<usize> {
        self.player_position(name).map(|i| self.custom.len() + i)
    }

    fn player_position(&self, name: &str) -> Option<usize> {
        self.player
            .iter()
            .position(|s| matches!(s, Some(s) if s.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_is_leading_word() {
        assert_eq!(ItemStack::new("Iron Helmet", 1).material(), "Iron");
        assert_eq!(ItemStack::new("Bread", 3).material(), "Bread");
    }

    #[test]
    fn index_searches_storage_only() {
        let mut inv = Inventory::new();
        inv.set_slot(5, Some(ItemStack::new("Iron Helmet", 1)));
        assert!(!inv.contains("Iron Helmet"));

        inv.set_slot(40, Some(ItemStack::new("Bread", 2)));
        inv.set_slot(12, Some(ItemStack::new("Bread", 5)));
        assert_eq!(inv.index("Bread"), Some(12));
        assert_eq!(inv.count("Bread"), 7);
    }

    #[test]
    fn window_index_offsets_past_container_slots() {
        let view = WindowView {
            custom: vec![None; 27],
            player: vec![None, Some(ItemStack::new("Bread", 1))],
        };
        assert_eq!(view.window_index("Bread"), Some(28));
        assert!(view.has_free_slot());
        assert_eq!(view.window_index("Apple"), None);
    }

    #[test]
    fn full_window_has_no_free_slot() {
        let view = WindowView {
            custom: vec![Some(ItemStack::new("Dirt", 64)); 27],
            player: vec![],
        };
        assert!(!view.has_free_slot());
    }

    #[test]
    fn armor_item_names() {
        assert_eq!(ArmorSlot::Boots.item_name("Diamond"), "Diamond Boots");
        assert_eq!(ArmorSlot::Helmet.slot_index(), 5);
    }
}
