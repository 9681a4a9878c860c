//! Self-feeding: eat the best food on hand until a target food level.

use peon_types::{FOOD, PeonError};
use tracing::{info, warn};

use crate::context::BehaviorContext;
use crate::params::EatParams;

/// Eat until the food level reaches `params.target`.
///
/// Each bite waits (bounded by the eat timeout) for the state update that
/// shows the held stack shrinking.  Returns whether the target was reached.
pub fn eat(ctx: &BehaviorContext, params: &EatParams) -> Result<bool, PeonError> {
    let agent = &ctx.agent;
    let food = agent
        .status()
        .food
        .ok_or_else(|| PeonError::StateUnavailable("food".to_string()))?;
    if food >= params.target {
        return Ok(true);
    }
    if !agent.equip_any_item_from_list(FOOD)? {
        warn!(food, "no food in inventory");
        return Ok(false);
    }

    loop {
        let status = agent.status();
        let Some(held) = status.held_item else { break };
        if status.food.is_some_and(|f| f >= params.target) {
            break;
        }
        info!(item = %held.name, food = ?status.food, "eating");
        agent.use_held_item()?;
        let consumed = agent.wait_for(
            &|s| match &s.held_item {
                None => true,
                Some(now) => now.name != held.name || now.count < held.count,
            },
            Some(ctx.tuning.eat_wait_timeout),
        );
        if !consumed {
            warn!(item = %held.name, "timed out waiting to finish eating");
            break;
        }
    }
    agent.stop_using_item()?;
    Ok(agent.status().food.is_some_and(|f| f >= params.target))
}
