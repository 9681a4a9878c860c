//! Fall recovery: drop straight down when left standing on air.

use peon_types::PeonError;
use tracing::{debug, info};

use crate::context::BehaviorContext;
use crate::params::FallParams;

/// Move onto the nearest solid block below when the block underfoot is air.
///
/// Returns `Ok(false)` when there was nothing to do: a move is already in
/// progress, the position or the block below is unknown, the agent is
/// standing on something, or there is no solid block below at all.
pub fn fall(ctx: &BehaviorContext, _params: &FallParams) -> Result<bool, PeonError> {
    let status = ctx.agent.status();
    if status.moving {
        return Ok(false);
    }
    let Some(here) = status.position.floor() else {
        return Ok(false);
    };
    match ctx.world.is_solid_block(here.below()) {
        None | Some(true) => return Ok(false),
        Some(false) => {}
    }
    let Some(ground) = ctx.world.next_solid_block_below(here) else {
        debug!(at = %here, "nothing solid below");
        return Ok(false);
    };

    info!(from = %here, to = %ground.above(), "falling");
    ctx.agent.set_on_ground(false);
    let landed = ctx.agent.move_to(
        f64::from(ground.x),
        f64::from(ground.y + 1),
        f64::from(ground.z),
        ctx.tuning.fall_speed,
    )?;
    ctx.agent.set_on_ground(landed);
    Ok(landed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, scene};
    use peon_hal::{Agent, SimCommand};
    use peon_types::BlockPos;

    #[test]
    fn standing_on_ground_is_noop() {
        let sim = scene().build();
        let ctx = context(&sim);
        assert!(!fall(&ctx, &FallParams::default()).unwrap());
        assert!(sim.commands().is_empty());
    }

    #[test]
    fn drops_onto_next_solid_block() {
        let sim = scene().with_position(BlockPos::new(2, 70, 2)).build();
        let ctx = context(&sim);

        assert!(fall(&ctx, &FallParams::default()).unwrap());
        assert_eq!(
            sim.commands(),
            vec![SimCommand::MoveTo { x: 2.0, y: 61.0, z: 2.0, speed: 13.0 }]
        );
        let status = sim.status();
        assert_eq!(status.position.floor(), Some(BlockPos::new(2, 61, 2)));
        assert!(status.on_ground);
    }

    #[test]
    fn unknown_position_is_noop() {
        let sim = peon_hal::SimWorld::builder().with_floor(60, 4).build();
        let ctx = context(&sim);
        assert!(!fall(&ctx, &FallParams::default()).unwrap());
        assert!(sim.commands().is_empty());
    }

    #[test]
    fn bottomless_drop_is_noop() {
        // Off the edge of the floor: nothing solid down to the void.
        let sim = scene().with_position(BlockPos::new(100, 70, 100)).build();
        let ctx = context(&sim);
        assert!(!fall(&ctx, &FallParams::default()).unwrap());
        assert!(sim.commands().is_empty());
    }
}
