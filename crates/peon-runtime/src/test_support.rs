//! Shared fixtures for behavior tests.

use std::sync::Arc;
use std::time::Duration;

use peon_hal::{SimWorld, SimWorldBuilder};
use peon_types::BlockPos;

use crate::config::Tuning;
use crate::context::BehaviorContext;

pub(crate) const ORIGIN: BlockPos = BlockPos::new(0, 61, 0);

/// Standing on a flat floor at full health and food, empty inventory.
pub(crate) fn scene() -> SimWorldBuilder {
    SimWorld::builder()
        .with_position(ORIGIN)
        .with_floor(60, 32)
        .with_health(20.0)
        .with_food(20)
        .with_inventory()
}

/// Default tuning with the long waits shortened.
pub(crate) fn fast_tuning() -> Tuning {
    Tuning {
        attack_timeout: Duration::from_millis(300),
        attack_step_timeout: Duration::from_millis(50),
        attack_pace: Duration::from_millis(5),
        eat_wait_timeout: Duration::from_millis(500),
        ..Tuning::default()
    }
}

pub(crate) fn context(sim: &SimWorld) -> BehaviorContext {
    BehaviorContext::new(Arc::new(sim.clone()), Arc::new(sim.clone()), fast_tuning())
}
