//! Self-defense: strike every targeted mob within reach.

use peon_types::{PeonError, WEAPONS};
use tracing::debug;

use crate::context::BehaviorContext;
use crate::params::DefendParams;

/// Attack every entity of a targeted type within strike range.
///
/// The targeted types are the configured `mob_types` together with
/// whatever a running hunt has temporarily added.  An empty target set is a
/// successful no-op; no entity in range is `Ok(false)`.
pub fn defend(ctx: &BehaviorContext, params: &DefendParams) -> Result<bool, PeonError> {
    let targets = ctx.overlay.union_with(&params.mob_types);
    if targets.is_empty() {
        return Ok(true);
    }
    let in_range = ctx.agent.entities_in_range(&targets, ctx.tuning.strike_range);
    if in_range.is_empty() {
        return Ok(false);
    }
    // Keep whatever is held when no weapon is available.
    ctx.agent.equip_any_item_from_list(WEAPONS)?;
    for entity in &in_range {
        debug!(eid = %entity.eid, kind = %entity.kind, "striking");
        ctx.agent.use_entity(entity.eid)?;
    }
    Ok(true)
}
