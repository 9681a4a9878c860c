//! Typed behavior parameters bound from stored [`Settings`].
//!
//! Settings are stored as loose positional `args` and keyword `kwargs` so
//! they can be edited from the console.  Each behavior declares a params
//! struct and the names of its positional parameters; [`Params::bind`]
//! zips the positional values onto those names, merges the keyword values,
//! and deserializes the result.  Duplicate or unknown parameters, surplus
//! positional values and ill-typed values all fail with
//! [`PeonError::InvalidSettings`].

use std::collections::BTreeSet;

use peon_types::{BehaviorKind, BlockPos, PeonError, Settings};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub trait Params: DeserializeOwned {
    const KIND: BehaviorKind;

    /// Parameter names in positional order.
    const POSITIONAL: &'static [&'static str];

    fn bind(settings: &Settings) -> Result<Self, PeonError> {
        let invalid = |details: String| PeonError::InvalidSettings {
            behavior: Self::KIND,
            details,
        };
        if settings.args.len() > Self::POSITIONAL.len() {
            return Err(invalid(format!(
                "takes at most {} positional arguments ({} given)",
                Self::POSITIONAL.len(),
                settings.args.len()
            )));
        }
        let mut fields: Map<String, Value> = Self::POSITIONAL
            .iter()
            .zip(&settings.args)
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        for (key, value) in &settings.kwargs {
            if fields.contains_key(key) {
                return Err(invalid(format!("got multiple values for argument '{key}'")));
            }
            fields.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(fields)).map_err(|e| invalid(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FallParams {}

impl Params for FallParams {
    const KIND: BehaviorKind = BehaviorKind::Fall;
    const POSITIONAL: &'static [&'static str] = &[];
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefendParams {
    pub mob_types: BTreeSet<String>,
}

impl Params for DefendParams {
    const KIND: BehaviorKind = BehaviorKind::Defend;
    const POSITIONAL: &'static [&'static str] = &["mob_types"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EatParams {
    pub target: u32,
}

impl Default for EatParams {
    fn default() -> Self {
        Self { target: 20 }
    }
}

impl Params for EatParams {
    const KIND: BehaviorKind = BehaviorKind::Eat;
    const POSITIONAL: &'static [&'static str] = &["target"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HuntParams {
    /// Where to start and return to; the current position when unset.
    pub home: Option<BlockPos>,
    pub mob_types: Vec<String>,
    pub space: u32,
    pub range: f64,
}

impl Default for HuntParams {
    fn default() -> Self {
        Self {
            home: None,
            mob_types: Vec::new(),
            space: 3,
            range: 50.0,
        }
    }
}

impl Params for HuntParams {
    const KIND: BehaviorKind = BehaviorKind::Hunt;
    const POSITIONAL: &'static [&'static str] = &["home", "mob_types", "space", "range"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatherParams {
    pub items: BTreeSet<String>,
    pub range: f64,
}

impl Default for GatherParams {
    fn default() -> Self {
        Self {
            items: BTreeSet::new(),
            range: 50.0,
        }
    }
}

impl Params for GatherParams {
    const KIND: BehaviorKind = BehaviorKind::Gather;
    const POSITIONAL: &'static [&'static str] = &["items", "range"];
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreParams {
    pub items: Vec<String>,
    pub chest_position: Option<BlockPos>,
}

impl Params for StoreParams {
    const KIND: BehaviorKind = BehaviorKind::Store;
    const POSITIONAL: &'static [&'static str] = &["items", "chest_position"];
}
