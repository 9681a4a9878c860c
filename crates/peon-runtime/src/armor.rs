//! Armor donning: wear the best piece on hand in every armor slot.

use peon_types::{ARMOR_MATERIALS, ArmorSlot, PeonError};
use tracing::info;

use crate::context::BehaviorContext;

/// Rank of a material in [`ARMOR_MATERIALS`]; lower is better.  Unknown or
/// missing materials rank below every known one.
fn rank(material: Option<&str>) -> usize {
    material
        .and_then(|m| ARMOR_MATERIALS.iter().position(|known| *known == m))
        .unwrap_or(ARMOR_MATERIALS.len())
}

/// Swap strictly better armor from the inventory into each armor slot.
///
/// Returns whether anything was swapped.  Takes no locks of its own.
pub fn don_armor(ctx: &BehaviorContext) -> Result<bool, PeonError> {
    let mut inventory = ctx
        .agent
        .status()
        .inventory
        .ok_or_else(|| PeonError::StateUnavailable("inventory".to_string()))?;

    let mut changed = false;
    for slot in ArmorSlot::ALL {
        let worn = rank(inventory.slot(slot.slot_index()).map(|s| s.material()));
        let better = ARMOR_MATERIALS[..worn]
            .iter()
            .find_map(|material| inventory.index(&slot.item_name(material)));
        if let Some(from) = better {
            if ctx.agent.swap_slots(slot.slot_index(), from)? {
                info!(slot = slot.piece(), from, "donning armor");
                inventory.swap(slot.slot_index(), from);
                changed = true;
            }
        }
    }
    Ok(changed)
}
