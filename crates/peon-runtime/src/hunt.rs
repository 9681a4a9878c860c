//! Hunting: travel from home to a mob, kill it, and walk back.
//!
//! The whole trip runs under the caller's movement lock.  While the trip
//! is under way the hunted mob types are scoped into the target overlay and
//! the defend behavior is switched on, so the concurrently running defend
//! loop does the striking while [`attack`] keeps the agent next to the
//! target.

use std::collections::BTreeSet;
use std::thread;
use std::time::Instant;

use peon_types::{BehaviorKind, Entity, PeonError};
use tracing::{info, instrument, warn};

use crate::armor::don_armor;
use crate::context::BehaviorContext;
use crate::params::HuntParams;

/// Hunt the nearest reachable mob of `params.mob_types`.
///
/// Returns the outcome of the final walk home; `Ok(false)` without moving
/// when health is unknown or too low, and `Ok(false)` when home cannot be
/// reached or no candidate has a path.
#[instrument(skip_all, fields(mob_types = ?params.mob_types))]
pub fn hunt(ctx: &BehaviorContext, params: &HuntParams) -> Result<bool, PeonError> {
    let agent = &ctx.agent;
    let status = agent.status();
    if !status.health_above(ctx.tuning.min_health) {
        warn!(health = ?status.health, "health unknown or too low to hunt");
        return Ok(false);
    }
    don_armor(ctx)?;

    let home = match params.home {
        Some(home) => home,
        None => status
            .position
            .floor()
            .ok_or_else(|| PeonError::StateUnavailable("position".to_string()))?,
    };
    if !agent.navigate_to(home, 0, ctx.tuning.home_timeout)? {
        warn!(%home, "failed to navigate home");
        return Ok(false);
    }

    let kinds: BTreeSet<String> = params.mob_types.iter().cloned().collect();
    let found = agent
        .entities_in_range(&kinds, params.range)
        .into_iter()
        .find_map(|entity| {
            info!(eid = %entity.eid, kind = %entity.kind, at = %entity.position, "hunting entity");
            ctx.world
                .find_path(home, entity.position, params.space, ctx.tuning.hunt_path_timeout)
                .filter(|path| !path.is_empty())
                .map(|path| (entity, path))
        });
    let Some((target, path)) = found else {
        return Ok(false);
    };

    let _scope = ctx
        .overlay
        .scoped(kinds.into_iter().chain([target.kind.clone()]));
    ctx.gates.enable(BehaviorKind::Defend);

    agent.follow_path(&path)?;
    attack(ctx, &target)?;
    if let Some(&last) = path.last() {
        agent.navigate_to(last, 0, ctx.tuning.navigate_timeout)?;
    }
    let way_back: Vec<_> = path.iter().rev().copied().chain([home]).collect();
    agent.follow_path(&way_back)
}

/// Stay next to `target` until it dies, health drops to the threshold, a
/// navigation fails, or the attack timeout elapses.
///
/// Runs inside the caller's movement lock.  Returns whether the target is
/// dead.
#[instrument(skip_all, fields(eid = %target.eid, kind = %target.kind))]
pub fn attack(ctx: &BehaviorContext, target: &Entity) -> Result<bool, PeonError> {
    let agent = &ctx.agent;
    let tuning = &ctx.tuning;
    let started = Instant::now();
    let _scope = ctx.overlay.scoped([target.kind.clone()]);

    while agent.status().health_above(tuning.min_health) && agent.is_entity_alive(target.eid) {
        let Some(at) = agent.entity_position(target.eid) else { break };
        if !agent.navigate_to(at, tuning.attack_space, tuning.attack_step_timeout)? {
            break;
        }
        if started.elapsed() > tuning.attack_timeout {
            break;
        }
        thread::sleep(tuning.attack_pace);
    }
    Ok(!agent.is_entity_alive(target.eid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BehaviorContext;
    use crate::test_support::{ORIGIN, context, fast_tuning, scene};
    use peon_hal::{Agent, AgentStatus, SimCommand, SimWorld};
    use peon_types::{BlockPos, ClickMode, EntityId, WindowView, WorldObject};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Simulated agent whose connection drops on the walk back: every
    /// `follow_path` after the first one faults.
    struct DropsOnReturn {
        sim: SimWorld,
        paths: AtomicUsize,
    }

    impl Agent for DropsOnReturn {
        fn status(&self) -> AgentStatus {
            self.sim.status()
        }
        fn wait_for(&self, condition: &dyn Fn(&AgentStatus) -> bool, timeout: Option<Duration>) -> bool {
            self.sim.wait_for(condition, timeout)
        }
        fn set_on_ground(&self, on_ground: bool) {
            self.sim.set_on_ground(on_ground)
        }
        fn move_to(&self, x: f64, y: f64, z: f64, speed: f64) -> Result<bool, PeonError> {
            self.sim.move_to(x, y, z, speed)
        }
        fn navigate_to(&self, target: BlockPos, space: u32, timeout: Duration) -> Result<bool, PeonError> {
            self.sim.navigate_to(target, space, timeout)
        }
        fn follow_path(&self, path: &[BlockPos]) -> Result<bool, PeonError> {
            if self.paths.fetch_add(1, Ordering::SeqCst) > 0 {
                return Err(PeonError::Capability {
                    primitive: "follow_path".to_string(),
                    details: "connection lost".to_string(),
                });
            }
            self.sim.follow_path(path)
        }
        fn entities_in_range(&self, kinds: &BTreeSet<String>, reach: f64) -> Vec<Entity> {
            self.sim.entities_in_range(kinds, reach)
        }
        fn objects_in_range(&self, items: &BTreeSet<String>, reach: f64) -> Vec<WorldObject> {
            self.sim.objects_in_range(items, reach)
        }
        fn is_entity_alive(&self, eid: EntityId) -> bool {
            self.sim.is_entity_alive(eid)
        }
        fn entity_position(&self, eid: EntityId) -> Option<BlockPos> {
            self.sim.entity_position(eid)
        }
        fn equip_any_item_from_list(&self, names: &[&str]) -> Result<bool, PeonError> {
            self.sim.equip_any_item_from_list(names)
        }
        fn use_entity(&self, eid: EntityId) -> Result<(), PeonError> {
            self.sim.use_entity(eid)
        }
        fn use_held_item(&self) -> Result<(), PeonError> {
            self.sim.use_held_item()
        }
        fn stop_using_item(&self) -> Result<(), PeonError> {
            self.sim.stop_using_item()
        }
        fn swap_slots(&self, a: usize, b: usize) -> Result<bool, PeonError> {
            self.sim.swap_slots(a, b)
        }
        fn click_inventory_block(&self, pos: BlockPos) -> Result<bool, PeonError> {
            self.sim.click_inventory_block(pos)
        }
        fn open_window(&self) -> Option<WindowView> {
            self.sim.open_window()
        }
        fn window_click(&self, slot: usize, mode: ClickMode) -> Result<bool, PeonError> {
            self.sim.window_click(slot, mode)
        }
        fn close_window(&self) -> Result<(), PeonError> {
            self.sim.close_window()
        }
    }

    fn params(types: &[&str]) -> HuntParams {
        HuntParams {
            mob_types: types.iter().map(|s| s.to_string()).collect(),
            ..HuntParams::default()
        }
    }

    #[test]
    fn low_health_refuses_without_navigating() {
        let sim = scene()
            .with_health(5.0)
            .with_entity("Cow", BlockPos::new(6, 61, 0), 10.0)
            .build();
        let ctx = context(&sim);

        assert!(!hunt(&ctx, &params(&["Cow"])).unwrap());
        assert!(!sim.commands().iter().any(SimCommand::is_motion));
        assert!(!ctx.gates.is_enabled(BehaviorKind::Defend));
    }

    #[test]
    fn successful_hunt_returns_home_and_restores_overlay() {
        let sim = scene().with_entity("Cow", BlockPos::new(8, 61, 0), 10.0).build();
        let ctx = context(&sim);
        let before = ctx.overlay.members();

        assert!(hunt(&ctx, &params(&["Cow"])).unwrap());
        assert_eq!(ctx.overlay.members(), before);
        assert!(ctx.gates.is_enabled(BehaviorKind::Defend));
        assert_eq!(sim.status().position.floor(), Some(ORIGIN));

        let paths: Vec<_> = sim
            .commands()
            .into_iter()
            .filter_map(|c| match c {
                SimCommand::FollowPath(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].last(), Some(&BlockPos::new(5, 61, 0)));
        assert_eq!(paths[1].last(), Some(&ORIGIN));
    }

    #[test]
    fn no_candidate_fails_and_restores_overlay() {
        let sim = scene().build();
        let ctx = context(&sim);
        assert!(!hunt(&ctx, &params(&["Cow"])).unwrap());
        assert!(ctx.overlay.is_empty());
    }

    #[test]
    fn fault_on_the_way_back_restores_overlay() {
        let sim = scene().with_entity("Cow", BlockPos::new(8, 61, 0), 10.0).build();
        let agent = DropsOnReturn {
            sim: sim.clone(),
            paths: AtomicUsize::new(0),
        };
        let ctx = BehaviorContext::new(Arc::new(agent), Arc::new(sim.clone()), fast_tuning());

        let err = hunt(&ctx, &params(&["Cow"])).unwrap_err();
        assert!(matches!(err, PeonError::Capability { .. }));
        // Defend is switched on only once the overlay scope has been entered.
        assert!(ctx.gates.is_enabled(BehaviorKind::Defend));
        assert!(ctx.overlay.is_empty());
        assert_ne!(sim.status().position.floor(), Some(ORIGIN));
    }

    #[test]
    fn unreachable_candidate_is_skipped() {
        let sim = scene()
            .with_entity("Pig", BlockPos::new(0, 61, 6), 10.0)
            .with_blocked(BlockPos::new(0, 61, 1))
            .with_entity("Pig", BlockPos::new(0, 61, -9), 10.0)
            .build();
        let ctx = context(&sim);

        assert!(hunt(&ctx, &params(&["Pig"])).unwrap());
        let first_path = sim.commands().into_iter().find_map(|c| match c {
            SimCommand::FollowPath(p) => Some(p),
            _ => None,
        });
        assert_eq!(first_path.and_then(|p| p.last().copied()), Some(BlockPos::new(0, 61, -6)));
    }

    #[test]
    fn attack_scopes_target_type_while_chasing() {
        let sim = scene().with_entity("Sheep", BlockPos::new(2, 61, 0), 8.0).build();
        let ctx = context(&sim);
        let target = sim.entities_in_range(&["Sheep".to_string()].into(), 10.0)[0].clone();

        // Nobody strikes in this test, so the chase ends on the timeout.
        let (seen, killed) = thread::scope(|s| {
            let chase = s.spawn(|| attack(&ctx, &target));
            let deadline = Instant::now() + Duration::from_secs(1);
            let mut seen = false;
            while !seen && Instant::now() < deadline {
                seen = ctx.overlay.members().contains("Sheep");
                thread::sleep(Duration::from_millis(1));
            }
            (seen, chase.join().unwrap().unwrap())
        });
        assert!(seen);
        assert!(!killed);
        assert!(ctx.overlay.is_empty());
        assert!(sim.commands().iter().any(|c| matches!(c, SimCommand::Navigate { .. })));
    }

    #[test]
    fn attack_ends_when_target_dies() {
        let sim = scene().with_entity("Chicken", BlockPos::new(2, 61, 0), 1.0).build();
        let ctx = context(&sim);
        let target = sim.entities_in_range(&["Chicken".to_string()].into(), 10.0)[0].clone();
        sim.use_entity(target.eid).unwrap();
        assert!(attack(&ctx, &target).unwrap());
    }
}
