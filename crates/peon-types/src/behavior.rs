//! Behavior names, lockable resources, and per-behavior call settings.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::PeonError;

/// The closed set of autonomous behaviors a robot can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorKind {
    /// Drop back to the ground when left hanging over a gap.
    Fall,
    /// Strike hostile mobs within reach.
    Defend,
    /// Eat until the food level reaches a target.
    Eat,
    /// Travel to a mob, kill it, and return home.
    Hunt,
    /// Travel to a dropped item, pick it up, and return.
    Gather,
    /// Deposit items into a chest.
    Store,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 6] = [
        BehaviorKind::Fall,
        BehaviorKind::Defend,
        BehaviorKind::Eat,
        BehaviorKind::Hunt,
        BehaviorKind::Gather,
        BehaviorKind::Store,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorKind::Fall => "fall",
            BehaviorKind::Defend => "defend",
            BehaviorKind::Eat => "eat",
            BehaviorKind::Hunt => "hunt",
            BehaviorKind::Gather => "gather",
            BehaviorKind::Store => "store",
        }
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BehaviorKind {
    type Err = PeonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BehaviorKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PeonError::UnknownBehavior(s.to_string()))
    }
}

/// A class of physical action that must not run concurrently with itself.
///
/// The derived ordering is the global lock acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// Equipping, eating, swapping slots, container windows.
    Inventory,
    /// Any command that moves the agent.
    Movement,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Inventory => f.write_str("inventory"),
            Resource::Movement => f.write_str("movement"),
        }
    }
}

/// Ordered set of resources a behavior holds while it runs.
pub type ResourceSet = BTreeSet<Resource>;

/// Positional and keyword call arguments for one behavior.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub kwargs: Map<String, Value>,
}

impl Settings {
    pub fn new(args: Vec<Value>, kwargs: Map<String, Value>) -> Self {
        Self { args, kwargs }
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }

    pub fn with_arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn with_kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn behavior_names_parse_case_insensitively() {
        assert_eq!("Hunt".parse::<BehaviorKind>().unwrap(), BehaviorKind::Hunt);
        assert_eq!(" store ".parse::<BehaviorKind>().unwrap(), BehaviorKind::Store);
        assert!(matches!(
            "dance".parse::<BehaviorKind>(),
            Err(PeonError::UnknownBehavior(name)) if name == "dance"
        ));
    }

    #[test]
    fn display_matches_parse() {
        for kind in BehaviorKind::ALL {
            assert_eq!(kind.to_string().parse::<BehaviorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn inventory_orders_before_movement() {
        let set: ResourceSet = [Resource::Movement, Resource::Inventory].into();
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(ordered, vec![Resource::Inventory, Resource::Movement]);
    }

    #[test]
    fn settings_builder_and_toml_shape() {
        let s = Settings::default()
            .with_arg(json!(["Bread"]))
            .with_kwarg("target", 18);
        assert_eq!(s.args.len(), 1);
        assert_eq!(s.kwargs["target"], json!(18));

        let parsed: Settings = serde_json::from_value(json!({ "kwargs": { "range": 20 } })).unwrap();
        assert!(parsed.args.is_empty());
        assert_eq!(parsed.kwargs["range"], json!(20));
    }
}
