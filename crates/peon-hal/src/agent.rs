//! Generic [`Agent`] trait – the body the behaviors drive.
//!
//! Implementations wrap a protocol connection (or a simulation) and expose
//! the agent's observed state plus the movement, inventory and interaction
//! primitives.  Behaviors only ever talk to the trait, so the transport can
//! be swapped without touching behavior logic.
//!
//! Observed state is shared with every behavior thread.  Implementations
//! guard it with a mutex and signal a condition variable on every update;
//! [`Agent::wait_for`] blocks on that condition.

use std::collections::BTreeSet;
use std::time::Duration;

use peon_types::{
    BlockPos, ClickMode, Entity, EntityId, Inventory, ItemStack, PeonError, Position,
    WindowView, WorldObject,
};

/// Snapshot of the agent's observed state.
///
/// Fields stay `None` until the server has reported them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgentStatus {
    pub position: Position,
    pub health: Option<f32>,
    pub food: Option<u32>,
    pub inventory: Option<Inventory>,
    pub held_item: Option<ItemStack>,
    pub on_ground: bool,
    /// `true` while a navigation or path-follow is in progress.
    pub moving: bool,
}

impl AgentStatus {
    /// `true` when health is known and strictly above `threshold`.
    pub fn health_above(&self, threshold: f32) -> bool {
        self.health.is_some_and(|h| h > threshold)
    }
}

/// A controllable in-world agent.
///
/// Command primitives return `Ok(false)` for routine misses (target
/// unreachable, timeout) and `Err` only when the underlying connection
/// faults.
pub trait Agent: Send + Sync {
    // ── observed state ─────────────────────────────────────────────────────

    fn status(&self) -> AgentStatus;

    /// Block until `condition` holds for the current state, rechecking on
    /// every state update.  `None` waits forever.
    ///
    /// Returns `false` if `timeout` elapsed first.
    fn wait_for(
        &self,
        condition: &dyn Fn(&AgentStatus) -> bool,
        timeout: Option<Duration>,
    ) -> bool;

    fn set_on_ground(&self, on_ground: bool);

    // ── movement ───────────────────────────────────────────────────────────

    /// Move in a straight line to `(x, y, z)` at `speed` blocks per second.
    fn move_to(&self, x: f64, y: f64, z: f64, speed: f64) -> Result<bool, PeonError>;

    /// Path to within `space` blocks of `target`, giving up after `timeout`.
    fn navigate_to(&self, target: BlockPos, space: u32, timeout: Duration)
    -> Result<bool, PeonError>;

    /// Walk `path` waypoint by waypoint.
    fn follow_path(&self, path: &[BlockPos]) -> Result<bool, PeonError>;

    // ── perception ─────────────────────────────────────────────────────────

    /// Living entities whose type is in `kinds` within `reach` blocks,
    /// nearest first.
    fn entities_in_range(&self, kinds: &BTreeSet<String>, reach: f64) -> Vec<Entity>;

    /// Ground items whose name is in `items` within `reach` blocks,
    /// nearest first.
    fn objects_in_range(&self, items: &BTreeSet<String>, reach: f64) -> Vec<WorldObject>;

    fn is_entity_alive(&self, eid: EntityId) -> bool;

    fn entity_position(&self, eid: EntityId) -> Option<BlockPos>;

    // ── inventory & interaction ────────────────────────────────────────────

    /// Hold the first item of `names` (in preference order) present in the
    /// inventory.  Returns `false`, leaving the held item alone, if none is.
    fn equip_any_item_from_list(&self, names: &[&str]) -> Result<bool, PeonError>;

    /// Interact with (attack) an entity using the held item.
    fn use_entity(&self, eid: EntityId) -> Result<(), PeonError>;

    /// Start using the held item (eat, drink, …).
    fn use_held_item(&self) -> Result<(), PeonError>;

    fn stop_using_item(&self) -> Result<(), PeonError>;

    /// Swap the contents of two inventory slots.
    fn swap_slots(&self, a: usize, b: usize) -> Result<bool, PeonError>;

    // ── container windows ──────────────────────────────────────────────────

    /// Right-click the block at `pos`.  Returns `true` once a container
    /// window has opened.
    fn click_inventory_block(&self, pos: BlockPos) -> Result<bool, PeonError>;

    /// View of the currently open window, if any.
    fn open_window(&self) -> Option<WindowView>;

    fn window_click(&self, slot: usize, mode: ClickMode) -> Result<bool, PeonError>;

    fn close_window(&self) -> Result<(), PeonError>;
}
