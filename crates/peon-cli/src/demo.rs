//! The simulated scene the console drives when no live agent is attached.

use peon_hal::SimWorld;
use peon_types::{BehaviorKind, BlockPos, Settings};
use serde_json::json;

pub const HOME: BlockPos = BlockPos::new(0, 61, 0);
pub const CHEST: BlockPos = BlockPos::new(3, 61, -3);

/// A flat meadow with a few animals, a zombie, a dropped apple and a chest.
pub fn scene() -> SimWorld {
    SimWorld::builder()
        .with_position(HOME)
        .with_floor(60, 48)
        .with_health(20.0)
        .with_food(14)
        .with_inventory()
        .with_item(36, "Stone Sword", 1)
        .with_item(37, "Cooked Beef", 8)
        .with_item(9, "Iron Chestplate", 1)
        .with_item(10, "Leather Boots", 1)
        .with_item(11, "Cobblestone", 64)
        .with_entity("Cow", BlockPos::new(10, 61, 6), 10.0)
        .with_entity("Pig", BlockPos::new(6, 61, -9), 10.0)
        .with_entity("Zombie", BlockPos::new(-12, 61, 3), 20.0)
        .with_object("Apple", BlockPos::new(4, 61, 4))
        .with_chest(CHEST)
        .build()
}

/// Settings for the on-demand behaviors when the config file gives none.
pub fn settings() -> Vec<(BehaviorKind, Settings)> {
    vec![
        (
            BehaviorKind::Hunt,
            Settings::default()
                .with_kwarg("home", json!(HOME))
                .with_kwarg("mob_types", json!(["Cow", "Pig"])),
        ),
        (
            BehaviorKind::Gather,
            Settings::default().with_kwarg("items", json!(["Apple"])),
        ),
        (
            BehaviorKind::Store,
            Settings::default()
                .with_kwarg("items", json!(["Cobblestone"]))
                .with_kwarg("chest_position", json!(CHEST)),
        ),
    ]
}
