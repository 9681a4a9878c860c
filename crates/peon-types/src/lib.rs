//! `peon-types` – shared vocabulary for the Peon behavior kernel.
//!
//! Positions, items, entities, behavior names, lockable resources, call
//! settings, and the single [`PeonError`] type used across the workspace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod behavior;
pub mod geometry;
pub mod item;

pub use behavior::{BehaviorKind, Resource, ResourceSet, Settings};
pub use geometry::{BlockPos, Position};
pub use item::{
    ARMOR_MATERIALS, ArmorSlot, ClickMode, FOOD, HOSTILE_MOBS, Inventory, ItemStack, WEAPONS,
    WindowView,
};

/// Server-assigned entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A living entity (mob, animal, player) seen by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub eid: EntityId,
    /// Mob type, e.g. `"Zombie"`.
    pub kind: String,
    pub position: BlockPos,
}

/// An item lying on the ground.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub eid: EntityId,
    /// Item name, e.g. `"Apple"`.
    pub item: String,
    pub position: BlockPos,
}

/// Errors surfaced by the behavior kernel.
///
/// Routine misses (no target, no path, navigation timeout) are reported as
/// `Ok(false)` by the behaviors; this type is for malformed state and
/// faults in the capability layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PeonError {
    #[error("Unknown behavior: {0}")]
    UnknownBehavior(String),

    #[error("Invalid settings for {behavior}: {details}")]
    InvalidSettings {
        behavior: BehaviorKind,
        details: String,
    },

    #[error("Agent state unavailable: {0}")]
    StateUnavailable(String),

    #[error("Capability fault in {primitive}: {details}")]
    Capability { primitive: String, details: String },

    #[error("Failed to start behavior thread: {0}")]
    Spawn(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peon_error_display() {
        let err = PeonError::InvalidSettings {
            behavior: BehaviorKind::Eat,
            details: "target must be a number".to_string(),
        };
        assert!(err.to_string().contains("eat"));
        assert!(err.to_string().contains("target must be a number"));

        let err = PeonError::UnknownBehavior("dance".to_string());
        assert_eq!(err.to_string(), "Unknown behavior: dance");
    }

    #[test]
    fn entity_roundtrip() {
        let entity = Entity {
            eid: EntityId(7),
            kind: "Zombie".to_string(),
            position: BlockPos::new(1, 64, 2),
        };
        let json = serde_json::to_string(&entity).unwrap();
        let back: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(entity, back);
    }
}
