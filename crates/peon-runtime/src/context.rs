//! [`BehaviorContext`] – everything a behavior may touch while it runs.

use std::sync::Arc;

use peon_hal::{Agent, World};
use peon_kernel::{GateSet, LoopMonitor, ResourceLocks, SettingsStore, TargetOverlay};
use peon_types::BehaviorKind;

use crate::config::Tuning;

/// Shared state behind every behavior thread of one robot.
///
/// Built once at robot construction and never torn down.
pub struct BehaviorContext {
    pub agent: Arc<dyn Agent>,
    pub world: Arc<dyn World>,
    pub locks: ResourceLocks,
    pub gates: GateSet,
    pub settings: SettingsStore,
    pub overlay: TargetOverlay,
    pub monitor: LoopMonitor,
    pub tuning: Tuning,
}

impl BehaviorContext {
    /// A context with every behavior registered, all gates clear and empty
    /// settings.
    pub fn new(agent: Arc<dyn Agent>, world: Arc<dyn World>, tuning: Tuning) -> Self {
        Self {
            agent,
            world,
            locks: ResourceLocks::new(),
            gates: GateSet::new(BehaviorKind::ALL),
            settings: SettingsStore::new(BehaviorKind::ALL.map(|k| (k, Default::default()))),
            overlay: TargetOverlay::new(),
            monitor: LoopMonitor::new(BehaviorKind::ALL),
            tuning,
        }
    }
}
