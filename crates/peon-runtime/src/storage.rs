//! Item storage: carry items to a chest and shift-click them in.

use peon_types::{ClickMode, PeonError};
use tracing::{error, info, instrument, warn};

use crate::context::BehaviorContext;
use crate::params::StoreParams;

/// Deposit every listed item into the chest at `params.chest_position`.
///
/// `Ok(true)` when none of the items is carried or all of them fit;
/// `Ok(false)` when there is no chest, it cannot be reached or opened, it
/// is full, or a click is refused.  An opened window is always closed.
#[instrument(skip_all, fields(items = ?params.items, chest = ?params.chest_position))]
pub fn store_items(ctx: &BehaviorContext, params: &StoreParams) -> Result<bool, PeonError> {
    let agent = &ctx.agent;
    let inventory = agent
        .status()
        .inventory
        .ok_or_else(|| PeonError::StateUnavailable("inventory".to_string()))?;
    let to_store: Vec<&String> = params.items.iter().filter(|i| inventory.contains(i)).collect();
    if to_store.is_empty() {
        return Ok(true);
    }
    let Some(chest) = params.chest_position else {
        warn!("no chest position given");
        return Ok(false);
    };

    if !agent.navigate_to(chest, ctx.tuning.chest_space, ctx.tuning.navigate_timeout)? {
        error!(%chest, "could not navigate to chest");
        return Ok(false);
    }
    if !agent.click_inventory_block(chest)? {
        error!(%chest, "could not open chest");
        return Ok(false);
    }
    if !agent.open_window().is_some_and(|w| w.has_free_slot()) {
        error!(%chest, "chest is full");
        agent.close_window()?;
        return Ok(false);
    }

    for item in to_store {
        while let Some(window) = agent.open_window() {
            if !window.has_free_slot() {
                break;
            }
            let Some(slot) = window.window_index(item) else { break };
            info!(%item, slot, "storing item");
            if !agent.window_click(slot, ClickMode::Shift)? {
                agent.close_window()?;
                return Ok(false);
            }
        }
    }
    agent.close_window()?;
    Ok(true)
}
