//! Static behavior registry: resources, pacing and default settings per
//! behavior, and the single dispatch point that binds settings and runs a
//! behavior.
//!
//! | Behavior | Locks | Interval | Default settings |
//! |---|---|---|---|
//! | `fall`   | movement            | 100 ms | – |
//! | `defend` | inventory           | 100 ms | `mob_types` = hostile mobs |
//! | `eat`    | inventory           | 10 s   | – |
//! | `hunt`   | movement            | 5 s    | – |
//! | `gather` | movement            | 5 s    | – |
//! | `store`  | inventory, movement | 30 s   | – |

use std::collections::BTreeMap;
use std::time::Duration;

use peon_types::{BehaviorKind, HOSTILE_MOBS, PeonError, Resource, ResourceSet, Settings};
use serde_json::json;

use crate::context::BehaviorContext;
use crate::params::{
    DefendParams, EatParams, FallParams, GatherParams, HuntParams, Params, StoreParams,
};
use crate::{defend, eat, fall, gather, hunt, storage};

/// How one behavior is scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorDescriptor {
    pub kind: BehaviorKind,
    pub locks: ResourceSet,
    pub interval: Duration,
    pub defaults: Settings,
}

impl BehaviorDescriptor {
    fn new(kind: BehaviorKind, locks: &[Resource], interval: Duration) -> Self {
        Self {
            kind,
            locks: locks.iter().copied().collect(),
            interval,
            defaults: Settings::default(),
        }
    }

    fn with_defaults(mut self, defaults: Settings) -> Self {
        self.defaults = defaults;
        self
    }
}

/// Every registered behavior, keyed by kind.
#[derive(Debug, Clone)]
pub struct Registry {
    descriptors: BTreeMap<BehaviorKind, BehaviorDescriptor>,
}

impl Default for Registry {
    fn default() -> Self {
        use BehaviorKind::*;
        use Resource::{Inventory, Movement};

        let tick = Duration::from_millis(100);
        let descriptors = [
            BehaviorDescriptor::new(Fall, &[Movement], tick),
            BehaviorDescriptor::new(Defend, &[Inventory], tick)
                .with_defaults(Settings::default().with_kwarg("mob_types", json!(HOSTILE_MOBS))),
            BehaviorDescriptor::new(Eat, &[Inventory], Duration::from_secs(10)),
            BehaviorDescriptor::new(Hunt, &[Movement], Duration::from_secs(5)),
            BehaviorDescriptor::new(Gather, &[Movement], Duration::from_secs(5)),
            BehaviorDescriptor::new(Store, &[Inventory, Movement], Duration::from_secs(30)),
        ];
        Self {
            descriptors: descriptors.into_iter().map(|d| (d.kind, d)).collect(),
        }
    }
}

impl Registry {
    pub fn get(&self, kind: BehaviorKind) -> Option<&BehaviorDescriptor> {
        self.descriptors.get(&kind)
    }

    pub fn get_mut(&mut self, kind: BehaviorKind) -> Option<&mut BehaviorDescriptor> {
        self.descriptors.get_mut(&kind)
    }

    /// Locks held while `kind` runs; empty for unregistered kinds.
    pub fn locks(&self, kind: BehaviorKind) -> ResourceSet {
        self.get(kind).map(|d| d.locks.clone()).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BehaviorDescriptor> {
        self.descriptors.values()
    }
}

/// Bind `settings` for `kind` and run one iteration of it.
///
/// The caller is responsible for holding the behavior's locks.
pub fn execute(
    kind: BehaviorKind,
    ctx: &BehaviorContext,
    settings: &Settings,
) -> Result<bool, PeonError> {
    match kind {
        BehaviorKind::Fall => fall::fall(ctx, &FallParams::bind(settings)?),
        BehaviorKind::Defend => defend::defend(ctx, &DefendParams::bind(settings)?),
        BehaviorKind::Eat => eat::eat(ctx, &EatParams::bind(settings)?),
        BehaviorKind::Hunt => hunt::hunt(ctx, &HuntParams::bind(settings)?),
        BehaviorKind::Gather => gather::gather(ctx, &GatherParams::bind(settings)?),
        BehaviorKind::Store => storage::store_items(ctx, &StoreParams::bind(settings)?),
    }
}
