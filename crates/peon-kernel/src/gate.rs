//! [`Gate`] – per-behavior enable/disable switch.
//!
//! A behavior loop parks in [`Gate::wait`] while its gate is clear.  The
//! wait is level triggered: the flag is rechecked under the mutex every
//! time the thread wakes, so a set/clear/set burst can never be lost and a
//! spurious wake-up never lets a loop run while the gate is clear.
//!
//! [`GateSet`] owns one gate per registered behavior.  Enabling or
//! disabling an unregistered behavior reports `false` instead of failing.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use peon_types::BehaviorKind;
use tracing::info;

/// A binary switch that threads can block on until it is set.
#[derive(Default)]
pub struct Gate {
    open: Mutex<bool>,
    changed: Condvar,
}

impl Gate {
    pub fn new(open: bool) -> Self {
        Self {
            open: Mutex::new(open),
            changed: Condvar::new(),
        }
    }

    pub fn set(&self) {
        *self.open.lock() = true;
        self.changed.notify_all();
    }

    pub fn clear(&self) {
        *self.open.lock() = false;
        self.changed.notify_all();
    }

    pub fn is_set(&self) -> bool {
        *self.open.lock()
    }

    /// Block until the gate is set.  Returns immediately if it already is.
    pub fn wait(&self) {
        let mut open = self.open.lock();
        while !*open {
            self.changed.wait(&mut open);
        }
    }

    /// Block until the gate is set or `timeout` elapses.
    ///
    /// Returns the gate state at wake-up.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut open = self.open.lock();
        while !*open {
            if self.changed.wait_until(&mut open, deadline).timed_out() {
                break;
            }
        }
        *open
    }
}

/// One [`Gate`] per registered behavior, fixed at construction.
#[derive(Default)]
pub struct GateSet {
    gates: BTreeMap<BehaviorKind, Gate>,
}

impl GateSet {
    /// Create a clear gate for each of `kinds`.
    pub fn new(kinds: impl IntoIterator<Item = BehaviorKind>) -> Self {
        Self {
            gates: kinds.into_iter().map(|k| (k, Gate::new(false))).collect(),
        }
    }

    pub fn get(&self, kind: BehaviorKind) -> Option<&Gate> {
        self.gates.get(&kind)
    }

    /// Set the gate for `kind`.  Returns `false` if `kind` is not registered.
    pub fn enable(&self, kind: BehaviorKind) -> bool {
        match self.gates.get(&kind) {
            Some(gate) => {
                if !gate.is_set() {
                    info!(behavior = %kind, "behavior enabled");
                }
                gate.set();
                true
            }
            None => false,
        }
    }

    /// Clear the gate for `kind`.  Returns `false` if `kind` is not
    /// registered.  A run already in progress is not interrupted.
    pub fn disable(&self, kind: BehaviorKind) -> bool {
        match self.gates.get(&kind) {
            Some(gate) => {
                if gate.is_set() {
                    info!(behavior = %kind, "behavior disabled");
                }
                gate.clear();
                true
            }
            None => false,
        }
    }

    pub fn is_enabled(&self, kind: BehaviorKind) -> bool {
        self.gates.get(&kind).is_some_and(Gate::is_set)
    }

    /// Behaviors whose gate is currently set, in [`BehaviorKind`] order.
    pub fn active(&self) -> Vec<BehaviorKind> {
        self.gates
            .iter()
            .filter(|(_, gate)| gate.is_set())
            .map(|(kind, _)| *kind)
            .collect()
    }
}
