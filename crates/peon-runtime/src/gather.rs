//! Gathering: walk to a dropped item, pick it up, and walk back.

use peon_types::PeonError;
use tracing::{info, instrument};

use crate::context::BehaviorContext;
use crate::params::GatherParams;

/// Fetch the nearest reachable ground item named in `params.items`.
///
/// Returns the outcome of the walk back to the starting block, or
/// `Ok(false)` when nothing reachable was found.
#[instrument(skip_all, fields(items = ?params.items))]
pub fn gather(ctx: &BehaviorContext, params: &GatherParams) -> Result<bool, PeonError> {
    let agent = &ctx.agent;
    let start = agent
        .status()
        .position
        .floor()
        .ok_or_else(|| PeonError::StateUnavailable("position".to_string()))?;

    let path = agent
        .objects_in_range(&params.items, params.range)
        .into_iter()
        .find_map(|object| {
            info!(eid = %object.eid, item = %object.item, at = %object.position, "gathering object");
            ctx.world
                .find_path(
                    start,
                    object.position,
                    ctx.tuning.gather_space,
                    ctx.tuning.gather_path_timeout,
                )
                .filter(|path| !path.is_empty())
        });
    let Some(path) = path else {
        return Ok(false);
    };

    agent.follow_path(&path)?;
    let way_back: Vec<_> = path.iter().rev().copied().chain([start]).collect();
    agent.follow_path(&way_back)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ORIGIN, context, scene};
    use peon_hal::Agent;
    use peon_types::BlockPos;

    fn params(items: &[&str]) -> GatherParams {
        GatherParams {
            items: items.iter().map(|s| s.to_string()).collect(),
            ..GatherParams::default()
        }
    }

    #[test]
    fn round_trip_collects_item_and_returns_to_start() {
        let sim = scene().with_object("Apple", BlockPos::new(4, 61, 3)).build();
        let ctx = context(&sim);

        assert!(gather(&ctx, &params(&["Apple"])).unwrap());
        assert!(sim.ground_items().is_empty());
        let status = sim.status();
        assert_eq!(status.position.floor(), Some(ORIGIN));
        assert_eq!(status.inventory.unwrap().count("Apple"), 1);
    }

    #[test]
    fn unlisted_items_are_ignored() {
        let sim = scene().with_object("Stick", BlockPos::new(2, 61, 0)).build();
        let ctx = context(&sim);
        assert!(!gather(&ctx, &params(&["Apple"])).unwrap());
        assert_eq!(sim.ground_items(), vec!["Stick".to_string()]);
        assert!(sim.commands().is_empty());
    }

    #[test]
    fn out_of_range_items_are_ignored() {
        let sim = scene().with_object("Apple", BlockPos::new(20, 61, 0)).build();
        let ctx = context(&sim);
        let near = GatherParams {
            range: 10.0,
            ..params(&["Apple"])
        };
        assert!(!gather(&ctx, &near).unwrap());
    }
}
