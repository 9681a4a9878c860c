//! [`SettingsStore`] – per-behavior call arguments.
//!
//! Each registered behavior owns one [`Settings`] value (positional
//! `args` plus keyword `kwargs`).  A write replaces the whole pair under a
//! single lock and a read clones the whole pair under the same lock, so a
//! reader never sees the args of one write combined with the kwargs of
//! another.  Loops read once at the start of every cycle: a write made
//! while a behavior is running takes effect on its next cycle.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use peon_types::{BehaviorKind, Settings};
use tracing::debug;

/// Settings for a fixed set of registered behaviors.
#[derive(Default)]
pub struct SettingsStore {
    entries: RwLock<BTreeMap<BehaviorKind, Settings>>,
}

impl SettingsStore {
    /// Register `kinds` with their initial settings.
    pub fn new(initial: impl IntoIterator<Item = (BehaviorKind, Settings)>) -> Self {
        Self {
            entries: RwLock::new(initial.into_iter().collect()),
        }
    }

    /// Replace the settings for `kind`.
    ///
    /// Returns `false`, storing nothing, if `kind` is not registered.
    pub fn set(&self, kind: BehaviorKind, settings: Settings) -> bool {
        let mut entries = self.entries.write();
        match entries.get_mut(&kind) {
            Some(slot) => {
                debug!(behavior = %kind, ?settings, "settings replaced");
                *slot = settings;
                true
            }
            None => false,
        }
    }

    /// Current settings for `kind`; empty when unregistered.
    pub fn get(&self, kind: BehaviorKind) -> Settings {
        self.entries.read().get(&kind).cloned().unwrap_or_default()
    }

    /// Apply `f` to the stored settings of `kind` as one atomic update.
    ///
    /// Returns `false` if `kind` is not registered.
    pub fn update(&self, kind: BehaviorKind, f: impl FnOnce(&mut Settings)) -> bool {
        match self.entries.write().get_mut(&kind) {
            Some(slot) => {
                f(slot);
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, kind: BehaviorKind) -> bool {
        self.entries.read().contains_key(&kind)
    }
}
