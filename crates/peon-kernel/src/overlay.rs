//! [`TargetOverlay`] – scoped, temporary additions to a shared target set.
//!
//! Hunting makes the concurrently running defend behavior engage the
//! hunted mob type for as long as the hunt lasts.  The addition is taken
//! through an [`OverlayScope`] guard, and dropping the guard removes
//! exactly what it added, on every exit path including panics.
//!
//! Members are reference counted.  Two overlapping scopes that both add
//! `"Zombie"` keep it in the set until the last one ends, and a scope never
//! removes a member some other scope still holds, whichever order they end
//! in.  Once all scopes are gone the overlay is empty again.
//!
//! # Example
//!
//! ```
//! use peon_kernel::TargetOverlay;
//!
//! let overlay = TargetOverlay::new();
//! let during = overlay.with_temporary_union(["Cow"], || overlay.members());
//! assert!(during.contains("Cow"));
//! assert!(overlay.members().is_empty());
//! ```

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::Mutex;
use tracing::debug;

/// Guarded, reference-counted set of temporary target types.
#[derive(Default)]
pub struct TargetOverlay {
    members: Mutex<BTreeMap<String, usize>>,
}

impl TargetOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `types` until the returned scope is dropped.
    pub fn scoped<I, S>(&self, types: I) -> OverlayScope<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let added: BTreeSet<String> = types.into_iter().map(Into::into).collect();
        {
            let mut members = self.members.lock();
            for t in &added {
                *members.entry(t.clone()).or_default() += 1;
            }
        }
        if !added.is_empty() {
            debug!(types = ?added, "target overlay extended");
        }
        OverlayScope {
            overlay: self,
            added,
        }
    }

    /// Run `body` with `types` temporarily added, restoring afterwards.
    pub fn with_temporary_union<I, S, R>(&self, types: I, body: impl FnOnce() -> R) -> R
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let _scope = self.scoped(types);
        body()
    }

    /// Types currently held by at least one scope.
    pub fn members(&self) -> BTreeSet<String> {
        self.members.lock().keys().cloned().collect()
    }

    /// `base` together with every overlay member.
    pub fn union_with(&self, base: &BTreeSet<String>) -> BTreeSet<String> {
        let members = self.members.lock();
        base.iter().cloned().chain(members.keys().cloned()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.members.lock().is_empty()
    }

    fn release(&self, added: &BTreeSet<String>) {
        let mut members = self.members.lock();
        for t in added {
            if let Some(count) = members.get_mut(t) {
                *count -= 1;
                if *count == 0 {
                    members.remove(t);
                }
            }
        }
    }
}

/// Live addition to a [`TargetOverlay`]; removes its members on drop.
pub struct OverlayScope<'a> {
    overlay: &'a TargetOverlay,
    added: BTreeSet<String>,
}

impl OverlayScope<'_> {
    pub fn added(&self) -> &BTreeSet<String> {
        &self.added
    }
}

impl Drop for OverlayScope<'_> {
    fn drop(&mut self) {
        self.overlay.release(&self.added);
        if !self.added.is_empty() {
            debug!(types = ?self.added, "target overlay restored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scope_adds_and_restores() {
        let overlay = TargetOverlay::new();
        {
            let scope = overlay.scoped(["Zombie", "Spider"]);
            assert_eq!(scope.added(), &set(&["Spider", "Zombie"]));
            assert_eq!(overlay.members(), set(&["Spider", "Zombie"]));
        }
        assert!(overlay.is_empty());
    }

    #[test]
    fn union_with_base_leaves_base_untouched() {
        let overlay = TargetOverlay::new();
        let base = set(&["Creeper"]);
        let _scope = overlay.scoped(["Cow"]);
        assert_eq!(overlay.union_with(&base), set(&["Cow", "Creeper"]));
        assert_eq!(base, set(&["Creeper"]));
    }

    #[test]
    fn interleaved_scopes_do_not_clobber_each_other() {
        let overlay = TargetOverlay::new();
        let first = overlay.scoped(["Zombie"]);
        let second = overlay.scoped(["Zombie", "Cow"]);

        // First ends before second: Zombie still held by second.
        drop(first);
        assert_eq!(overlay.members(), set(&["Cow", "Zombie"]));

        drop(second);
        assert!(overlay.is_empty());
    }

    #[test]
    fn duplicate_types_in_one_scope_count_once() {
        let overlay = TargetOverlay::new();
        {
            let _scope = overlay.scoped(["Pig", "Pig"]);
        }
        assert!(overlay.is_empty());
    }

    #[test]
    fn restored_on_early_return_and_panic() {
        let overlay = TargetOverlay::new();

        let early = |fail: bool| -> Result<(), ()> {
            let _scope = overlay.scoped(["Sheep"]);
            if fail {
                return Err(());
            }
            Ok(())
        };
        assert!(early(true).is_err());
        assert!(overlay.is_empty());

        let result = catch_unwind(AssertUnwindSafe(|| {
            overlay.with_temporary_union(["Sheep"], || panic!("hunt failed hard"))
        }));
        assert!(result.is_err());
        assert!(overlay.is_empty());
    }
}
