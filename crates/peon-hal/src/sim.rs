//! In-process simulation of an agent and its surroundings.
//!
//! [`SimWorld`] implements both [`Agent`] and [`World`] over a small,
//! deterministic block world.  Every issued command is recorded so tests
//! can assert on what a behavior did, and the number of simultaneous
//! movement commands is tracked so tests can assert that movement never
//! overlaps.  This lets the full behavior stack run in headless tests and
//! in the console demo without a server connection.
//!
//! # Simulation rules
//!
//! | Primitive | Simulated effect |
//! |---|---|
//! | `move_to` / `navigate_to` / `follow_path` | Teleports after the configured motion delay; picks up ground items within 1.5 blocks of every waypoint. |
//! | `find_path` | Straight walk along x, then z, then y; fails on blocked cells. |
//! | `use_entity` | Damages the entity by the held sword (Diamond 7, Iron 6, Stone 5, Golden/Wooden 4, bare 1); it despawns at zero. |
//! | `use_held_item` | Food: consumes one item and restores 4 food (max 20), after the update delay. |
//! | `window_click` (shift) | Moves a player stack into the first empty chest slot. |
//!
//! # Example
//!
//! ```rust
//! use peon_hal::{Agent, SimWorld};
//! use peon_types::BlockPos;
//!
//! let sim = SimWorld::builder()
//!     .with_position(BlockPos::new(0, 61, 0))
//!     .with_floor(60, 8)
//!     .with_food(12)
//!     .with_item(36, "Bread", 3)
//!     .build();
//!
//! assert!(sim.equip_any_item_from_list(&["Bread"]).unwrap());
//! sim.use_held_item().unwrap();
//! assert_eq!(sim.status().food, Some(16));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use peon_types::item::{HOTBAR_SLOTS, STORAGE_SLOTS};
use peon_types::{
    BlockPos, ClickMode, Entity, EntityId, FOOD, Inventory, ItemStack, PeonError, Position,
    WindowView, WorldObject,
};
use tracing::debug;

use crate::agent::{Agent, AgentStatus};
use crate::world::World;

/// Slots in a single chest.
pub const CHEST_SLOTS: usize = 27;

const MAX_FOOD: u32 = 20;
const FOOD_PER_ITEM: u32 = 4;
const PICKUP_RADIUS: f64 = 1.5;
const MAX_PATH_LEN: usize = 512;

// ────────────────────────────────────────────────────────────────────────────
// Command log
// ────────────────────────────────────────────────────────────────────────────

/// A primitive issued against the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimCommand {
    MoveTo { x: f64, y: f64, z: f64, speed: f64 },
    Navigate { target: BlockPos, space: u32 },
    FollowPath(Vec<BlockPos>),
    Equip(String),
    UseEntity(EntityId),
    UseItem,
    StopUsing,
    Swap(usize, usize),
    OpenWindow(BlockPos),
    WindowClick { slot: usize, mode: ClickMode },
    CloseWindow,
}

impl SimCommand {
    /// `true` for commands that move the agent.
    pub fn is_motion(&self) -> bool {
        matches!(
            self,
            SimCommand::MoveTo { .. } | SimCommand::Navigate { .. } | SimCommand::FollowPath(_)
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Simulation state
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct SimEntity {
    eid: EntityId,
    kind: String,
    position: BlockPos,
    health: f32,
}

#[derive(Debug, Clone)]
struct SimObject {
    eid: EntityId,
    item: String,
    position: BlockPos,
}

#[derive(Default)]
struct SimState {
    status: AgentStatus,
    held_slot: usize,
    solid: BTreeSet<BlockPos>,
    blocked: BTreeSet<BlockPos>,
    entities: Vec<SimEntity>,
    objects: Vec<SimObject>,
    chests: BTreeMap<BlockPos, Vec<Option<ItemStack>>>,
    window: Option<BlockPos>,
    commands: Vec<SimCommand>,
    next_eid: u32,
    in_motion: usize,
    max_in_motion: usize,
}

impl SimState {
    fn snapshot(&self) -> AgentStatus {
        let mut status = self.status.clone();
        status.held_item = self
            .status
            .inventory
            .as_ref()
            .and_then(|inv| inv.slot(self.held_slot))
            .cloned();
        status
    }

    fn here(&self) -> Option<BlockPos> {
        self.status.position.floor()
    }

    fn held(&self) -> Option<&ItemStack> {
        self.status.inventory.as_ref()?.slot(self.held_slot)
    }

    fn next_eid(&mut self) -> EntityId {
        self.next_eid += 1;
        EntityId(self.next_eid)
    }

    /// Move the agent onto `pos`, picking up nearby ground items.
    fn arrive(&mut self, pos: Position) {
        self.status.position = pos;
        let Some(here) = pos.floor() else { return };
        let (picked, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.objects)
            .into_iter()
            .partition(|o| o.position.distance(here) <= PICKUP_RADIUS);
        self.objects = rest;
        for object in picked {
            debug!(item = %object.item, at = %here, "sim: picked up item");
            if let Some(inv) = self.status.inventory.as_mut() {
                match inv.index(&object.item) {
                    Some(i) => {
                        let count = inv.slot(i).map_or(0, |s| s.count);
                        inv.set_slot(i, Some(ItemStack::new(object.item.clone(), count + 1)));
                    }
                    None => {
                        if let Some(i) = inv.first_empty(STORAGE_SLOTS) {
                            inv.set_slot(i, Some(ItemStack::new(object.item.clone(), 1)));
                        }
                    }
                }
            }
        }
    }

    fn plan(&self, from: BlockPos, to: BlockPos, space: u32) -> Option<Vec<BlockPos>> {
        let within = |p: BlockPos| p.distance(to) <= f64::from(space);
        let mut path = Vec::new();
        let mut cursor = from;
        while !within(cursor) && cursor != to {
            cursor = if cursor.x != to.x {
                cursor.offset((to.x - cursor.x).signum(), 0, 0)
            } else if cursor.z != to.z {
                cursor.offset(0, 0, (to.z - cursor.z).signum())
            } else {
                cursor.offset(0, (to.y - cursor.y).signum(), 0)
            };
            if self.blocked.contains(&cursor) || path.len() >= MAX_PATH_LEN {
                return None;
            }
            path.push(cursor);
        }
        Some(path)
    }

    fn distance_to(&self, pos: BlockPos) -> Option<f64> {
        self.here().map(|here| here.distance(pos))
    }
}

/// Damage dealt by a held item, keyed on sword material.
fn weapon_damage(held: Option<&ItemStack>) -> f32 {
    match held {
        Some(item) if item.name.ends_with("Sword") => match item.material() {
            "Diamond" => 7.0,
            "Iron" => 6.0,
            "Stone" => 5.0,
            _ => 4.0,
        },
        _ => 1.0,
    }
}

struct SimInner {
    state: Mutex<SimState>,
    changed: Condvar,
    motion_delay: Duration,
    update_delay: Duration,
    panic_on_equip: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// SimWorld
// ────────────────────────────────────────────────────────────────────────────

/// Shared handle to a simulated agent and world.  Clones share state.
#[derive(Clone)]
pub struct SimWorld {
    inner: Arc<SimInner>,
}

impl SimWorld {
    /// Start building a simulation with an unknown position and no
    /// inventory, health or food.
    pub fn builder() -> SimWorldBuilder {
        SimWorldBuilder::default()
    }

    fn record(&self, command: SimCommand) -> parking_lot::MutexGuard<'_, SimState> {
        let mut state = self.inner.state.lock();
        state.commands.push(command);
        state
    }

    /// Run `apply` as one movement: counted as in motion for the duration
    /// of the configured motion delay.
    fn in_motion<R>(&self, path_following: bool, apply: impl FnOnce(&mut SimState) -> R) -> R {
        {
            let mut state = self.inner.state.lock();
            state.in_motion += 1;
            state.max_in_motion = state.max_in_motion.max(state.in_motion);
            if path_following {
                state.status.moving = true;
            }
        }
        self.inner.changed.notify_all();
        if !self.inner.motion_delay.is_zero() {
            thread::sleep(self.inner.motion_delay);
        }
        let result = {
            let mut state = self.inner.state.lock();
            let result = apply(&mut state);
            state.in_motion -= 1;
            if state.in_motion == 0 {
                state.status.moving = false;
            }
            result
        };
        self.inner.changed.notify_all();
        result
    }

    /// Apply a state update now, or after the update delay on a separate
    /// thread.
    fn update_later(&self, update: impl FnOnce(&mut SimState) + Send + 'static) {
        if self.inner.update_delay.is_zero() {
            update(&mut self.inner.state.lock());
            self.inner.changed.notify_all();
            return;
        }
        let inner = Arc::clone(&self.inner);
        thread::spawn(move || {
            thread::sleep(inner.update_delay);
            update(&mut inner.state.lock());
            inner.changed.notify_all();
        });
    }

    fn mutate(&self, f: impl FnOnce(&mut SimState)) {
        f(&mut self.inner.state.lock());
        self.inner.changed.notify_all();
    }

    // ── test and demo inspection ───────────────────────────────────────────

    /// Every command issued so far, in order.
    pub fn commands(&self) -> Vec<SimCommand> {
        self.inner.state.lock().commands.clone()
    }

    pub fn clear_commands(&self) {
        self.inner.state.lock().commands.clear();
    }

    /// Largest number of movement commands ever in flight at once.
    pub fn max_concurrent_motion(&self) -> usize {
        self.inner.state.lock().max_in_motion
    }

    /// Remaining ground items, by name.
    pub fn ground_items(&self) -> Vec<String> {
        self.inner.state.lock().objects.iter().map(|o| o.item.clone()).collect()
    }

    pub fn entity_count(&self) -> usize {
        self.inner.state.lock().entities.len()
    }

    pub fn chest_contents(&self, pos: BlockPos) -> Option<Vec<Option<ItemStack>>> {
        self.inner.state.lock().chests.get(&pos).cloned()
    }

    pub fn is_window_open(&self) -> bool {
        self.inner.state.lock().window.is_some()
    }

    // ── state injection ────────────────────────────────────────────────────

    pub fn set_position(&self, pos: BlockPos) {
        self.mutate(|s| s.status.position = Position::from(pos));
    }

    pub fn set_health(&self, health: f32) {
        self.mutate(|s| s.status.health = Some(health));
    }

    pub fn set_food(&self, food: u32) {
        self.mutate(|s| s.status.food = Some(food));
    }

    /// Put `count` of `name` into inventory slot `slot`, creating an empty
    /// inventory first if none was reported yet.
    pub fn give_item(&self, slot: usize, name: &str, count: u32) {
        self.mutate(|s| {
            s.status
                .inventory
                .get_or_insert_with(Inventory::new)
                .set_slot(slot, Some(ItemStack::new(name, count)));
        });
    }

    pub fn spawn_entity(&self, kind: &str, position: BlockPos, health: f32) -> EntityId {
        let mut state = self.inner.state.lock();
        let eid = state.next_eid();
        state.entities.push(SimEntity {
            eid,
            kind: kind.to_string(),
            position,
            health,
        });
        eid
    }

    pub fn drop_object(&self, item: &str, position: BlockPos) -> EntityId {
        let mut state = self.inner.state.lock();
        let eid = state.next_eid();
        state.objects.push(SimObject {
            eid,
            item: item.to_string(),
            position,
        });
        eid
    }
}

impl Agent for SimWorld {
    fn status(&self) -> AgentStatus {
        self.inner.state.lock().snapshot()
    }

    fn wait_for(
        &self,
        condition: &dyn Fn(&AgentStatus) -> bool,
        timeout: Option<Duration>,
    ) -> bool {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut state = self.inner.state.lock();
        loop {
            if condition(&state.snapshot()) {
                return true;
            }
            match deadline {
                Some(deadline) => {
                    if self.inner.changed.wait_until(&mut state, deadline).timed_out() {
                        return condition(&state.snapshot());
                    }
                }
                None => self.inner.changed.wait(&mut state),
            }
        }
    }

    fn set_on_ground(&self, on_ground: bool) {
        self.mutate(|s| s.status.on_ground = on_ground);
    }

    fn move_to(&self, x: f64, y: f64, z: f64, speed: f64) -> Result<bool, PeonError> {
        drop(self.record(SimCommand::MoveTo { x, y, z, speed }));
        let target = Position::known(x, y, z);
        Ok(self.in_motion(false, |s| {
            match target.floor() {
                Some(block) if s.blocked.contains(&block) => false,
                _ => {
                    s.arrive(target);
                    true
                }
            }
        }))
    }

    fn navigate_to(
        &self,
        target: BlockPos,
        space: u32,
        timeout: Duration,
    ) -> Result<bool, PeonError> {
        let here = {
            let state = self.record(SimCommand::Navigate { target, space });
            state.here()
        };
        let Some(here) = here else { return Ok(false) };
        let Some(path) = self.find_path(here, target, space, timeout) else {
            return Ok(false);
        };
        Ok(self.in_motion(true, |s| {
            for step in &path {
                s.arrive(Position::from(*step));
            }
            true
        }))
    }

    fn follow_path(&self, path: &[BlockPos]) -> Result<bool, PeonError> {
        drop(self.record(SimCommand::FollowPath(path.to_vec())));
        Ok(self.in_motion(true, |s| {
            for step in path {
                if s.blocked.contains(step) {
                    return false;
                }
                s.arrive(Position::from(*step));
            }
            true
        }))
    }

    fn entities_in_range(&self, kinds: &BTreeSet<String>, reach: f64) -> Vec<Entity> {
        let state = self.inner.state.lock();
        let mut found: Vec<(f64, Entity)> = state
            .entities
            .iter()
            .filter(|e| kinds.contains(&e.kind))
            .filter_map(|e| {
                let d = state.distance_to(e.position)?;
                (d <= reach).then(|| {
                    (
                        d,
                        Entity {
                            eid: e.eid,
                            kind: e.kind.clone(),
                            position: e.position,
                        },
                    )
                })
            })
            .collect();
        found.sort_by(|a, b| a.0.total_cmp(&b.0));
        found.into_iter().map(|(_, e)| e).collect()
    }

    fn objects_in_range(&self, items: &BTreeSet<String>, reach: f64) -> Vec<WorldObject> {
        let state = self.inner.state.lock();
        let mut found: Vec<(f64, WorldObject)> = state
            .objects
            .iter()
            .filter(|o| items.contains(&o.item))
            .filter_map(|o| {
                let d = state.distance_to(o.position)?;
                (d <= reach).then(|| {
                    (
                        d,
                        WorldObject {
                            eid: o.eid,
                            item: o.item.clone(),
                            position: o.position,
                        },
                    )
                })
            })
            .collect();
        found.sort_by(|a, b| a.0.total_cmp(&b.0));
        found.into_iter().map(|(_, o)| o).collect()
    }

    fn is_entity_alive(&self, eid: EntityId) -> bool {
        self.inner.state.lock().entities.iter().any(|e| e.eid == eid)
    }

    fn entity_position(&self, eid: EntityId) -> Option<BlockPos> {
        self.inner
            .state
            .lock()
            .entities
            .iter()
            .find(|e| e.eid == eid)
            .map(|e| e.position)
    }

    fn equip_any_item_from_list(&self, names: &[&str]) -> Result<bool, PeonError> {
        if self.inner.panic_on_equip {
            panic!("sim: equip primitive failed");
        }
        let mut state = self.inner.state.lock();
        let Some(inv) = state.status.inventory.as_ref() else {
            return Err(PeonError::StateUnavailable("inventory".to_string()));
        };
        let Some((name, from)) = names
            .iter()
            .find_map(|name| inv.index(name).map(|i| (name.to_string(), i)))
        else {
            return Ok(false);
        };
        state.commands.push(SimCommand::Equip(name));
        if HOTBAR_SLOTS.contains(&from) {
            state.held_slot = from;
        } else {
            let held = state.held_slot;
            if let Some(inv) = state.status.inventory.as_mut() {
                inv.swap(from, held);
            }
        }
        drop(state);
        self.inner.changed.notify_all();
        Ok(true)
    }

    fn use_entity(&self, eid: EntityId) -> Result<(), PeonError> {
        let mut state = self.record(SimCommand::UseEntity(eid));
        let damage = weapon_damage(state.held());
        if let Some(entity) = state.entities.iter_mut().find(|e| e.eid == eid) {
            entity.health -= damage;
        }
        state.entities.retain(|e| e.health > 0.0);
        drop(state);
        self.inner.changed.notify_all();
        Ok(())
    }

    fn use_held_item(&self) -> Result<(), PeonError> {
        let state = self.record(SimCommand::UseItem);
        let is_food = state.held().is_some_and(|item| FOOD.contains(&item.name.as_str()));
        let held_slot = state.held_slot;
        drop(state);
        if !is_food {
            return Ok(());
        }
        self.update_later(move |s| {
            let Some(inv) = s.status.inventory.as_mut() else { return };
            let Some(item) = inv.slot(held_slot).cloned() else { return };
            let rest = (item.count > 1).then(|| ItemStack::new(item.name, item.count - 1));
            inv.set_slot(held_slot, rest);
            let food = s.status.food.unwrap_or(0);
            s.status.food = Some((food + FOOD_PER_ITEM).min(MAX_FOOD));
        });
        Ok(())
    }

    fn stop_using_item(&self) -> Result<(), PeonError> {
        drop(self.record(SimCommand::StopUsing));
        Ok(())
    }

    fn swap_slots(&self, a: usize, b: usize) -> Result<bool, PeonError> {
        let mut state = self.record(SimCommand::Swap(a, b));
        let swapped = match state.status.inventory.as_mut() {
            Some(inv) => {
                inv.swap(a, b);
                true
            }
            None => false,
        };
        drop(state);
        self.inner.changed.notify_all();
        Ok(swapped)
    }

    fn click_inventory_block(&self, pos: BlockPos) -> Result<bool, PeonError> {
        let mut state = self.record(SimCommand::OpenWindow(pos));
        if state.chests.contains_key(&pos) {
            state.window = Some(pos);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn open_window(&self) -> Option<WindowView> {
        let state = self.inner.state.lock();
        let chest = state.chests.get(&state.window?)?;
        let player = state
            .status
            .inventory
            .as_ref()
            .map(|inv| inv.slots()[STORAGE_SLOTS].to_vec())
            .unwrap_or_default();
        Some(WindowView {
            custom: chest.clone(),
            player,
        })
    }

    fn window_click(&self, slot: usize, mode: ClickMode) -> Result<bool, PeonError> {
        let mut state = self.record(SimCommand::WindowClick { slot, mode });
        let Some(at) = state.window else { return Ok(false) };
        if mode != ClickMode::Shift || slot < CHEST_SLOTS {
            return Ok(false);
        }
        let from = STORAGE_SLOTS.start + (slot - CHEST_SLOTS);
        let Some(stack) = state.status.inventory.as_ref().and_then(|inv| inv.slot(from)).cloned()
        else {
            return Ok(false);
        };
        let Some(free) = state
            .chests
            .get(&at)
            .and_then(|chest| chest.iter().position(Option::is_none))
        else {
            return Ok(false);
        };
        if let Some(chest) = state.chests.get_mut(&at) {
            chest[free] = Some(stack);
        }
        if let Some(inv) = state.status.inventory.as_mut() {
            inv.set_slot(from, None);
        }
        drop(state);
        self.inner.changed.notify_all();
        Ok(true)
    }

    fn close_window(&self) -> Result<(), PeonError> {
        self.record(SimCommand::CloseWindow).window = None;
        Ok(())
    }
}

impl World for SimWorld {
    fn is_solid_block(&self, pos: BlockPos) -> Option<bool> {
        if !(0..=255).contains(&pos.y) {
            return None;
        }
        Some(self.inner.state.lock().solid.contains(&pos))
    }

    fn find_path(
        &self,
        from: BlockPos,
        to: BlockPos,
        space: u32,
        _timeout: Duration,
    ) -> Option<Vec<BlockPos>> {
        self.inner.state.lock().plan(from, to, space)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Builder for a [`SimWorld`] scene.
#[derive(Default)]
pub struct SimWorldBuilder {
    state: SimState,
    motion_delay: Duration,
    update_delay: Duration,
    panic_on_equip: bool,
}

impl SimWorldBuilder {
    pub fn with_position(mut self, pos: BlockPos) -> Self {
        self.state.status.position = Position::from(pos);
        self.state.status.on_ground = true;
        self
    }

    pub fn with_health(mut self, health: f32) -> Self {
        self.state.status.health = Some(health);
        self
    }

    pub fn with_food(mut self, food: u32) -> Self {
        self.state.status.food = Some(food);
        self
    }

    /// Report an (empty) inventory.
    pub fn with_inventory(mut self) -> Self {
        self.state.status.inventory.get_or_insert_with(Inventory::new);
        self
    }

    /// Put `count` of `name` into inventory `slot`.
    pub fn with_item(mut self, slot: usize, name: &str, count: u32) -> Self {
        self.state
            .status
            .inventory
            .get_or_insert_with(Inventory::new)
            .set_slot(slot, Some(ItemStack::new(name, count)));
        self
    }

    /// Hotbar slot the agent holds; defaults to the first hotbar slot.
    pub fn with_held_slot(mut self, slot: usize) -> Self {
        self.state.held_slot = slot;
        self
    }

    /// Solid square floor at height `y`, `radius` blocks around the origin.
    pub fn with_floor(mut self, y: i32, radius: i32) -> Self {
        for x in -radius..=radius {
            for z in -radius..=radius {
                self.state.solid.insert(BlockPos::new(x, y, z));
            }
        }
        self
    }

    pub fn with_solid(mut self, pos: BlockPos) -> Self {
        self.state.solid.insert(pos);
        self
    }

    /// Make `pos` impassable for path planning and movement.
    pub fn with_blocked(mut self, pos: BlockPos) -> Self {
        self.state.blocked.insert(pos);
        self
    }

    pub fn with_entity(mut self, kind: &str, position: BlockPos, health: f32) -> Self {
        let eid = self.state.next_eid();
        self.state.entities.push(SimEntity {
            eid,
            kind: kind.to_string(),
            position,
            health,
        });
        self
    }

    pub fn with_object(mut self, item: &str, position: BlockPos) -> Self {
        let eid = self.state.next_eid();
        self.state.objects.push(SimObject {
            eid,
            item: item.to_string(),
            position,
        });
        self
    }

    /// An empty chest at `pos`.
    pub fn with_chest(self, pos: BlockPos) -> Self {
        self.with_chest_contents(pos, vec![None; CHEST_SLOTS])
    }

    /// A chest at `pos` with every slot taken.
    pub fn with_full_chest(self, pos: BlockPos) -> Self {
        self.with_chest_contents(pos, vec![Some(ItemStack::new("Cobblestone", 64)); CHEST_SLOTS])
    }

    pub fn with_chest_contents(mut self, pos: BlockPos, mut slots: Vec<Option<ItemStack>>) -> Self {
        slots.resize(CHEST_SLOTS, None);
        self.state.chests.insert(pos, slots);
        self
    }

    /// Time each movement command takes.
    pub fn with_motion_delay(mut self, delay: Duration) -> Self {
        self.motion_delay = delay;
        self
    }

    /// Delay before the effects of using an item show up in the state.
    pub fn with_update_delay(mut self, delay: Duration) -> Self {
        self.update_delay = delay;
        self
    }

    /// Make `equip_any_item_from_list` panic.
    pub fn panic_on_equip(mut self) -> Self {
        self.panic_on_equip = true;
        self
    }

    pub fn build(mut self) -> SimWorld {
        if !HOTBAR_SLOTS.contains(&self.state.held_slot) {
            self.state.held_slot = HOTBAR_SLOTS.start;
        }
        SimWorld {
            inner: Arc::new(SimInner {
                state: Mutex::new(self.state),
                changed: Condvar::new(),
                motion_delay: self.motion_delay,
                update_delay: self.update_delay,
                panic_on_equip: self.panic_on_equip,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SimWorldBuilder {
        SimWorld::builder()
            .with_position(BlockPos::new(0, 61, 0))
            .with_floor(60, 16)
            .with_health(20.0)
            .with_food(20)
            .with_inventory()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn solid_blocks_and_build_height() {
        let sim = base().build();
        assert_eq!(sim.is_solid_block(BlockPos::new(0, 60, 0)), Some(true));
        assert_eq!(sim.is_solid_block(BlockPos::new(0, 61, 0)), Some(false));
        assert_eq!(sim.is_solid_block(BlockPos::new(0, -1, 0)), None);
        assert_eq!(
            sim.next_solid_block_below(BlockPos::new(2, 70, 2)),
            Some(BlockPos::new(2, 60, 2))
        );
    }

    #[test]
    fn find_path_stops_within_space() {
        let sim = base().build();
        let path = sim
            .find_path(BlockPos::new(0, 61, 0), BlockPos::new(5, 61, 0), 1, Duration::from_secs(1))
            .unwrap();
        assert_eq!(path.last(), Some(&BlockPos::new(4, 61, 0)));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn find_path_fails_on_blocked_cell() {
        let sim = base().with_blocked(BlockPos::new(2, 61, 0)).build();
        assert!(
            sim.find_path(BlockPos::new(0, 61, 0), BlockPos::new(5, 61, 0), 0, Duration::from_secs(1))
                .is_none()
        );
    }

    #[test]
    fn following_a_path_picks_up_items() {
        let sim = base().with_object("Apple", BlockPos::new(3, 61, 0)).build();
        let path = sim
            .find_path(BlockPos::new(0, 61, 0), BlockPos::new(3, 61, 0), 1, Duration::from_secs(1))
            .unwrap();
        assert!(sim.follow_path(&path).unwrap());
        assert!(sim.ground_items().is_empty());
        assert!(sim.status().inventory.unwrap().contains("Apple"));
    }

    #[test]
    fn entities_sorted_by_proximity() {
        let sim = base()
            .with_entity("Zombie", BlockPos::new(8, 61, 0), 20.0)
            .with_entity("Zombie", BlockPos::new(2, 61, 0), 20.0)
            .with_entity("Cow", BlockPos::new(1, 61, 0), 10.0)
            .build();
        let found = sim.entities_in_range(&set(&["Zombie"]), 50.0);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].position, BlockPos::new(2, 61, 0));
        assert!(sim.entities_in_range(&set(&["Zombie"]), 1.0).is_empty());
    }

    #[test]
    fn sword_kills_entity() {
        let sim = base()
            .with_item(20, "Diamond Sword", 1)
            .with_entity("Zombie", BlockPos::new(1, 61, 0), 14.0)
            .build();
        let zombie = sim.entities_in_range(&set(&["Zombie"]), 4.0)[0].eid;
        assert!(sim.equip_any_item_from_list(&["Diamond Sword"]).unwrap());
        sim.use_entity(zombie).unwrap();
        assert!(sim.is_entity_alive(zombie));
        sim.use_entity(zombie).unwrap();
        assert!(!sim.is_entity_alive(zombie));
    }

    #[test]
    fn equip_moves_storage_item_into_hand() {
        let sim = base().with_item(12, "Bread", 2).build();
        assert!(sim.equip_any_item_from_list(&["Cooked Beef", "Bread"]).unwrap());
        assert_eq!(sim.status().held_item, Some(ItemStack::new("Bread", 2)));
        assert!(!sim.equip_any_item_from_list(&["Apple"]).unwrap());
        assert_eq!(sim.commands(), vec![SimCommand::Equip("Bread".to_string())]);
    }

    #[test]
    fn delayed_eating_wakes_waiters() {
        let sim = base()
            .with_food(10)
            .with_item(36, "Bread", 1)
            .with_update_delay(Duration::from_millis(20))
            .build();
        sim.use_held_item().unwrap();
        assert_eq!(sim.status().food, Some(10));
        assert!(sim.wait_for(&|s| s.held_item.is_none(), Some(Duration::from_secs(2))));
        assert_eq!(sim.status().food, Some(14));
    }

    #[test]
    fn wait_for_times_out() {
        let sim = base().build();
        assert!(!sim.wait_for(&|s| s.food == Some(0), Some(Duration::from_millis(10))));
    }

    #[test]
    fn shift_click_moves_stack_into_chest() {
        let chest = BlockPos::new(2, 61, 0);
        let sim = base().with_item(9, "Cobblestone", 64).with_chest(chest).build();
        assert!(sim.click_inventory_block(chest).unwrap());
        let window = sim.open_window().unwrap();
        let slot = window.window_index("Cobblestone").unwrap();
        assert_eq!(slot, CHEST_SLOTS);
        assert!(sim.window_click(slot, ClickMode::Shift).unwrap());
        assert!(!sim.open_window().unwrap().player_contains("Cobblestone"));
        sim.close_window().unwrap();
        assert!(!sim.is_window_open());
        assert_eq!(
            sim.chest_contents(chest).unwrap()[0],
            Some(ItemStack::new("Cobblestone", 64))
        );
    }

    #[test]
    fn motion_is_counted() {
        let sim = base().with_motion_delay(Duration::from_millis(5)).build();
        assert!(sim.move_to(1.5, 61.0, 0.5, 13.0).unwrap());
        assert_eq!(sim.max_concurrent_motion(), 1);
        assert_eq!(sim.status().position.floor(), Some(BlockPos::new(1, 61, 0)));
    }
}
