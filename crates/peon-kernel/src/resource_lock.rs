//! [`ResourceLocks`] – named mutual-exclusion domains for physical actions.
//!
//! Each [`Resource`] owns one lock.  A behavior that needs several
//! resources acquires them all through [`ResourceLocks::acquire`], which
//! always takes them in ascending [`Resource`] order.  With a single global
//! order no two behaviors can wait on each other in a cycle, whatever their
//! lock sets look like.
//!
//! The returned [`CompositeGuard`] releases every lock when dropped, so the
//! critical section is released on early return, on error, and while
//! unwinding from a panic.  The locks never poison.
//!
//! # Example
//!
//! ```
//! use peon_kernel::ResourceLocks;
//! use peon_types::{Resource, ResourceSet};
//!
//! let locks = ResourceLocks::new();
//! let both: ResourceSet = [Resource::Movement, Resource::Inventory].into();
//!
//! let guard = locks.acquire(&both);
//! assert!(locks.is_locked(Resource::Inventory));
//! assert!(locks.try_acquire(&[Resource::Movement].into()).is_none());
//! drop(guard);
//! assert!(!locks.is_locked(Resource::Movement));
//! ```

use parking_lot::{Mutex, MutexGuard};
use peon_types::{Resource, ResourceSet};

/// One lock per [`Resource`].
#[derive(Default)]
pub struct ResourceLocks {
    inventory: Mutex<()>,
    movement: Mutex<()>,
}

impl ResourceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until every resource in `set` is held by the caller.
    ///
    /// An empty set returns an empty guard immediately.
    pub fn acquire(&self, set: &ResourceSet) -> CompositeGuard<'_> {
        // BTreeSet iterates in ascending order: the global acquisition order.
        let held = set
            .iter()
            .map(|&resource| (resource, self.lock_for(resource).lock()))
            .collect();
        CompositeGuard { held }
    }

    /// Take every resource in `set` without blocking.
    ///
    /// Returns `None`, holding nothing, if any of them is busy.
    pub fn try_acquire(&self, set: &ResourceSet) -> Option<CompositeGuard<'_>> {
        let mut held = Vec::with_capacity(set.len());
        for &resource in set {
            held.push((resource, self.lock_for(resource).try_lock()?));
        }
        Some(CompositeGuard { held })
    }

    /// `true` while some caller holds `resource`.
    pub fn is_locked(&self, resource: Resource) -> bool {
        self.lock_for(resource).is_locked()
    }

    fn lock_for(&self, resource: Resource) -> &Mutex<()> {
        match resource {
            Resource::Inventory => &self.inventory,
            Resource::Movement => &self.movement,
        }
    }
}

/// Holds a set of resource locks; releases all of them on drop.
pub struct CompositeGuard<'a> {
    held: Vec<(Resource, MutexGuard<'a, ()>)>,
}

impl CompositeGuard<'_> {
    /// Resources held by this guard, in acquisition order.
    pub fn resources(&self) -> impl Iterator<Item = Resource> + '_ {
        self.held.iter().map(|(r, _)| *r)
    }
}

impl std::fmt::Debug for CompositeGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.resources()).finish()
    }
}
